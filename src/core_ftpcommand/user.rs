use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::info;

/// Handles the USER FTP command.
///
/// This function stores the username for the session and requests the password from the client.
/// The account is only looked up once PASS arrives.
///
/// # Arguments
///
/// * `writer` - The control connection used to send responses.
/// * `session` - The session being authenticated.
/// * `username` - The username provided by the client.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_user_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    username: String,
) -> Result<(), std::io::Error> {
    info!("Received USER command with username: {}", username);

    let response = if username.eq_ignore_ascii_case("anonymous") {
        info!("Anonymous login initiated from {}", session.remote_addr());
        responses::ANONYMOUS_NEED_PASSWORD
    } else {
        responses::NEED_PASSWORD
    };
    session.username = Some(username);

    send_response(writer, response).await
}
