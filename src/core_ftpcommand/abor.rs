use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::info;

/// Handles the ABOR FTP command.
///
/// ABOR does not interrupt a transfer in flight: it closes the data channel and
/// ends the whole session, same as QUIT.
pub async fn handle_abor_command(
    writer: &mut ControlWriter,
    session: &mut Session,
) -> Result<(), std::io::Error> {
    info!("[{}] ABOR received, terminating session", session.user_label());
    session.data.close();
    send_response(writer, responses::ABORT_OK).await
}
