use crate::core_auth::AuthError;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{info, warn};

/// Handles the PASS FTP command before login.
///
/// A successful check attaches the account and a cursor at its home directory.
/// After that point the session never accepts USER or PASS again.
pub async fn handle_pass_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    password: String,
) -> Result<(), std::io::Error> {
    let username = match &session.username {
        Some(username) => username.clone(),
        None => {
            warn!("PASS without USER from {}", session.remote_addr());
            return send_response(writer, AuthError::MissingUser.to_ftp_response()).await;
        }
    };

    match session.context.accounts.authenticate(&username, &password) {
        Ok(account) => {
            info!(
                "User {} logged in from {} ({:?})",
                account.username(),
                session.remote_addr(),
                account.permission()
            );
            if !account.home().is_dir() {
                warn!(
                    "Home directory of {} does not exist: {:?}",
                    account.username(),
                    account.home()
                );
            }
            session.login(account);
            send_response(writer, responses::LOGGED_IN).await
        }
        Err(e) => {
            warn!("Login failed from {}: {}", session.remote_addr(), e);
            send_response(writer, e.to_ftp_response()).await
        }
    }
}
