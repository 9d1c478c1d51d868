use crate::constants::DEFAULT_UPLOAD_BUFFER_SIZE;
use crate::core_ftpcommand::utils::{acquire_data_stream, opening_reply, resolve_path};
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info, warn};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader};

/// Handles the STOR (Store File) FTP command.
///
/// This function copies the whole data stream into a created or truncated file.
/// A partially written file is deleted when the transfer fails or the session
/// ends before the copy completes.
///
/// # Arguments
///
/// * `writer` - The control connection used to send responses.
/// * `session` - The session owning the data channel and cursor.
/// * `arg` - The name of the file to be stored.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_stor_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(data_stream) = acquire_data_stream(writer, session).await? else {
        return Ok(());
    };

    let Some(file_path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    let mut file = match File::create(&file_path).await {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create file: {:?}, error: {}", file_path, e);
            return send_response(writer, responses::ACTION_NOT_TAKEN).await;
        }
    };
    // Also fires when the session is torn down mid-transfer.
    let mut partial = PartialUpload::new(file_path.clone());

    send_response(writer, opening_reply(session.transfer_type)).await?;

    let buffer_size = session
        .context
        .config
        .server
        .upload_buffer_size
        .unwrap_or(DEFAULT_UPLOAD_BUFFER_SIZE);
    let mut reader = BufReader::with_capacity(buffer_size, data_stream);

    let copied = match tokio::io::copy_buf(&mut reader, &mut file).await {
        Ok(n) => file.flush().await.map(|_| n),
        Err(e) => Err(e),
    };
    drop(reader);
    drop(file);

    match copied {
        Ok(bytes) => {
            partial.keep();
            info!(
                "[{}] Stored {} bytes in {:?}",
                session.user_label(),
                bytes,
                file_path
            );
            send_response(writer, responses::TRANSFER_COMPLETE).await
        }
        Err(e) => {
            error!("Upload to {:?} failed: {}", file_path, e);
            drop(partial);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}

/// Removes an upload's destination on drop unless [`keep`](Self::keep) was called.
struct PartialUpload {
    path: Option<PathBuf>,
}

impl PartialUpload {
    fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn keep(&mut self) {
        self.path = None;
    }
}

impl Drop for PartialUpload {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => info!("Removed partial upload {:?}", path),
                Err(e) => warn!("Failed to remove partial file {:?}: {}", path, e),
            }
        }
    }
}
