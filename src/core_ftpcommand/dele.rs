use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs;

/// Handles the DELE (Delete File) FTP command.
///
/// This function deletes a regular file. Directories are refused; use RMD.
///
/// # Arguments
///
/// * `writer` - The control connection used to send responses.
/// * `session` - The session whose cursor resolves the path.
/// * `arg` - The file name to delete.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_dele_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(file_path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    match fs::metadata(&file_path).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => {
            warn!("DELE target is not a regular file: {:?}", file_path);
            return send_response(writer, responses::ACTION_NOT_TAKEN).await;
        }
    }

    match fs::remove_file(&file_path).await {
        Ok(_) => {
            info!("File deleted: {:?}", file_path);
            send_response(writer, responses::ACTION_COMPLETED).await
        }
        Err(e) => {
            error!("Failed to delete file: {:?}, error: {}", file_path, e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
