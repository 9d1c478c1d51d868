use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs;

/// Handles the RMD (Remove Directory) FTP command.
///
/// Only empty directories are removed. The home root and the directory the
/// cursor currently sits in are never removed.
pub async fn handle_rmd_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    info!("Received RMD command with argument: {}", arg);

    let Some(dir_path) = resolve_path(session, &arg, true) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    let protected = session
        .cursor
        .as_ref()
        .is_some_and(|c| dir_path == c.home() || c.physical_path().starts_with(&dir_path));
    if protected {
        warn!("Refusing to remove {:?}", dir_path);
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    }

    match fs::remove_dir(&dir_path).await {
        Ok(_) => {
            info!("Directory removed successfully: {:?}", dir_path);
            send_response(writer, responses::ACTION_COMPLETED).await
        }
        Err(e) => {
            error!("Failed to remove directory: {:?}, error: {}", dir_path, e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}
