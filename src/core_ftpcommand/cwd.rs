use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{info, warn};

/// Handles CWD (and CDUP, which arrives here as `CWD ..`).
///
/// The reply never says why a change was refused.
pub async fn handle_cwd_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let user = session.user_label().to_string();
    let Some(cursor) = session.cursor.as_mut() else {
        return send_response(writer, responses::NOT_LOGGED_IN).await;
    };

    match cursor.navigate(&arg) {
        Ok(()) => {
            info!("[{}] Directory changed to {}", user, cursor.virtual_path());
            send_response(writer, responses::ACTION_COMPLETED).await
        }
        Err(e) => {
            warn!("[{}] Failed to change directory to {:?}: {}", user, arg, e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
