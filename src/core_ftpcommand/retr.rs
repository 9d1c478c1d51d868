use crate::constants::DEFAULT_DOWNLOAD_BUFFER_SIZE;
use crate::core_ftpcommand::utils::{acquire_data_stream, opening_reply, resolve_path};
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufReader};

/// Handles the RETR (Retrieve) FTP command.
///
/// This function sends an existing regular file over the data connection and
/// closes it afterwards.
///
/// # Arguments
///
/// * `writer` - The control connection used to send responses.
/// * `session` - The session owning the data channel and cursor.
/// * `arg` - The name of the file to retrieve.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_retr_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(mut data_stream) = acquire_data_stream(writer, session).await? else {
        return Ok(());
    };

    let Some(file_path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    let file = match File::open(&file_path).await {
        Ok(f) => f,
        Err(e) => {
            error!(
                "File not found or could not be opened: {:?}, error: {}",
                file_path, e
            );
            return send_response(writer, responses::ACTION_NOT_TAKEN).await;
        }
    };
    match file.metadata().await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return send_response(writer, responses::ACTION_NOT_TAKEN).await,
    }

    send_response(writer, opening_reply(session.transfer_type)).await?;
    info!("Sending file: {:?}", file_path);

    let buffer_size = session
        .context
        .config
        .server
        .download_buffer_size
        .unwrap_or(DEFAULT_DOWNLOAD_BUFFER_SIZE);
    let mut reader = BufReader::with_capacity(buffer_size, file);

    let sent = tokio::io::copy_buf(&mut reader, &mut data_stream).await;
    if let Err(e) = data_stream.shutdown().await {
        warn!("Error shutting down data stream: {}", e);
    }
    drop(data_stream);

    match sent {
        Ok(bytes) => {
            info!("File transfer completed successfully: {:?} ({} bytes)", file_path, bytes);
            send_response(writer, responses::TRANSFER_COMPLETE).await
        }
        Err(e) => {
            error!("Error sending file to client: {}", e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
