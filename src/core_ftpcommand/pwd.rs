// src/core_ftpcommand/pwd.rs
use crate::helpers::{send_response, ControlWriter};
use crate::session::Session;

pub async fn handle_pwd_command(
    writer: &mut ControlWriter,
    session: &mut Session,
) -> Result<(), std::io::Error> {
    let current_dir = session
        .cursor
        .as_ref()
        .map(|c| c.virtual_path())
        .unwrap_or_else(|| "/".to_string());
    let response = format!(
        "257 \"{}\" is the current directory.\r\n",
        current_dir.replace('"', "\"\"")
    );
    send_response(writer, response.as_bytes()).await
}
