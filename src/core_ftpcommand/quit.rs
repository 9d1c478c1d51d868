use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use log::info;

/// Handles the QUIT FTP command.
///
/// This function sends a response indicating the service is closing the control connection.
/// The caller ends the session afterwards.
pub async fn handle_quit_command(writer: &mut ControlWriter) -> Result<(), std::io::Error> {
    info!("Received QUIT command. Closing connection.");
    send_response(writer, responses::GOODBYE).await
}
