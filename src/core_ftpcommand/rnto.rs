use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the RNTO (Rename To) FTP command.
///
/// The pending RNFR source is consumed whatever the outcome.
pub async fn handle_rnto_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(old_path) = session.rename_from.take() else {
        return send_response(writer, responses::BAD_SEQUENCE).await;
    };

    let Some(new_path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    match fs::rename(&old_path, &new_path).await {
        Ok(_) => {
            info!("Renamed {:?} to {:?}", old_path, new_path);
            send_response(writer, responses::ACTION_COMPLETED).await
        }
        Err(e) => {
            error!("Failed to rename {:?} to {:?}: {}", old_path, new_path, e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
