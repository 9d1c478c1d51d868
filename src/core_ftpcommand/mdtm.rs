use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use chrono::{DateTime, Utc};
use log::error;
use std::time::SystemTime;

pub fn format_mdtm(modified: SystemTime) -> String {
    let datetime: DateTime<Utc> = modified.into();
    datetime.format("%Y%m%d%H%M%S").to_string()
}

/// Handles the MDTM (Modification Time) FTP command, reporting UTC.
pub async fn handle_mdtm_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let Some(file_path) = resolve_path(session, &arg, false) else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    let modified = match tokio::fs::metadata(&file_path).await {
        Ok(metadata) if metadata.is_file() => metadata.modified(),
        Ok(_) => return send_response(writer, responses::ACTION_NOT_TAKEN).await,
        Err(e) => Err(e),
    };

    match modified {
        Ok(modified) => {
            let response = format!("213 {}\r\n", format_mdtm(modified));
            send_response(writer, response.as_bytes()).await
        }
        Err(e) => {
            error!("Failed to read modification time of {:?}: {}", file_path, e);
            send_response(writer, responses::ACTION_NOT_TAKEN).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_mdtm() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(format_mdtm(t), "20231114221320");
    }
}
