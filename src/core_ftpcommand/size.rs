// core_ftpcommand/size.rs

use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info};

/// Handles the SIZE (File Size) FTP command.
///
/// Replies `213 <bytes>` for regular files only.
pub async fn handle_size_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(file_path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    let metadata = match tokio::fs::metadata(&file_path).await {
        Ok(metadata) => metadata,
        Err(e) => {
            error!("Failed to get file metadata: {:?}, error: {}", file_path, e);
            return send_response(writer, responses::ACTION_NOT_TAKEN).await;
        }
    };

    if !metadata.is_file() {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    }

    let file_size = metadata.len();
    info!("File size for {:?} is {}", file_path, file_size);
    send_response(writer, format!("213 {}\r\n", file_size).as_bytes()).await
}
