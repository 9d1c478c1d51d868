use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use log::info;

/// Handles the SYST (System) FTP command.
///
/// Reports a UNIX-style system type. Can be switched off via the `[commands]` table.
pub async fn handle_syst_command(writer: &mut ControlWriter) -> Result<(), std::io::Error> {
    info!("Responding to SYST command with system type.");
    send_response(writer, responses::SYSTEM_TYPE).await
}
