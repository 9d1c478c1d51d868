use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{info, warn};
use tokio::fs;

/// Handles the RNFR (Rename From) FTP command.
///
/// This function records an existing regular file as the source of the next RNTO.
pub async fn handle_rnfr_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => {
            info!("[{}] Rename source set to {:?}", session.user_label(), path);
            session.rename_from = Some(path);
            send_response(writer, responses::PENDING_FURTHER_INFO).await
        }
        _ => {
            warn!("RNFR target does not exist or is not a file: {:?}", path);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
