use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::{Session, TransferType};
use log::{error, warn};
use std::path::PathBuf;
use tokio::net::TcpStream;

/// Resolves a client argument through the session cursor, logging why it failed.
pub fn resolve_path(session: &Session, arg: &str, is_directory: bool) -> Option<PathBuf> {
    let cursor = session.cursor.as_ref()?;
    match cursor.create_path(arg, is_directory) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("[{}] Rejected path {:?}: {}", session.user_label(), arg, e);
            None
        }
    }
}

/// Waits for any outstanding passive accept and takes the data stream.
///
/// On failure a 425 reply has already been sent and the channel is closed;
/// the caller must not run the transfer.
pub async fn acquire_data_stream(
    writer: &mut ControlWriter,
    session: &mut Session,
) -> Result<Option<TcpStream>, std::io::Error> {
    let limit = session.context.config.pasv_timeout();
    match session.data.take_ready_stream(limit).await {
        Ok(stream) => Ok(Some(stream)),
        Err(e) => {
            error!("[{}] Data connection unavailable: {}", session.user_label(), e);
            send_response(writer, e.to_ftp_response()).await?;
            Ok(None)
        }
    }
}

pub fn opening_reply(transfer_type: TransferType) -> &'static [u8] {
    match transfer_type {
        TransferType::Ascii => responses::OPENING_DATA_ASCII,
        TransferType::Binary => responses::OPENING_DATA_BINARY,
    }
}

/// Drops leading `ls`-style option flags (`-la`) from a LIST/NLST argument.
///
/// The rest is kept byte for byte. A `--` token ends the flags, so names that
/// start with `-` can still be listed.
pub fn strip_list_flags(arg: &str) -> Option<String> {
    let mut rest = arg.trim_start_matches(' ');
    while rest.starts_with('-') {
        let (token, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        let is_flag = token == "--"
            || (token.len() > 1 && token[1..].chars().all(|c| c.is_ascii_alphabetic()));
        if !is_flag {
            break;
        }
        rest = tail.trim_start_matches(' ');
        if token == "--" {
            break;
        }
    }
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}
