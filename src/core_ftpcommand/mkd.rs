use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info};
use tokio::fs;

/// Handles the MKD (Make Directory) FTP command.
///
/// This function creates a new directory relative to the session's current directory.
/// Resolution failures and filesystem errors get the same reply.
///
/// # Arguments
///
/// * `writer` - The control connection used to send responses.
/// * `session` - The session whose cursor resolves the path.
/// * `arg` - The directory name to create.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_mkd_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    info!("Received MKD command with argument: {}", arg);

    let Some(dir_path) = resolve_path(session, &arg, true) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    match fs::create_dir(&dir_path).await {
        Ok(_) => {
            info!("Directory created successfully: {:?}", dir_path);
            let shown = session
                .cursor
                .as_ref()
                .map(|c| c.virtual_path_of(&dir_path))
                .unwrap_or(arg);
            let response = format!("257 \"{}\" directory created.\r\n", shown.replace('"', "\"\""));
            send_response(writer, response.as_bytes()).await
        }
        Err(e) => {
            error!("Failed to create directory: {:?}, error: {}", dir_path, e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
