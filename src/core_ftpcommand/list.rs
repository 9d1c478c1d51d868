use crate::core_ftpcommand::utils::{
    acquire_data_stream, opening_reply, resolve_path, strip_list_flags,
};
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use chrono::{DateTime, Datelike, Local};
use log::{error, info, warn};
use std::fs::Metadata;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Handles LIST and NLST.
///
/// The data connection is collected first (waiting for a pending passive
/// accept), then the target directory is enumerated onto it, one line per
/// entry: `ls -l` style for LIST, bare names for NLST. The data connection is
/// closed before the final reply.
pub async fn handle_list_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
    names_only: bool,
) -> Result<(), std::io::Error> {
    let Some(mut data_stream) = acquire_data_stream(writer, session).await? else {
        return Ok(());
    };

    let target = match strip_list_flags(&arg) {
        Some(path) => resolve_path(session, &path, true),
        None => session.cursor.as_ref().map(|c| c.physical_path().to_path_buf()),
    };
    let Some(target) = target else {
        return send_response(writer, responses::ACTION_NOT_TAKEN).await;
    };

    let listing = match build_listing(&target, names_only).await {
        Ok(listing) => listing,
        Err(e) => {
            error!("Error reading directory {:?}: {}", target, e);
            return send_response(writer, responses::ACTION_NOT_TAKEN).await;
        }
    };

    send_response(writer, opening_reply(session.transfer_type)).await?;

    if let Err(e) = data_stream.write_all(listing.as_bytes()).await {
        error!("Failed to send directory listing: {:?}", e);
        return send_response(writer, responses::TRANSFER_ABORTED).await;
    }
    if let Err(e) = data_stream.shutdown().await {
        warn!("Failed to shutdown data stream: {:?}", e);
    }
    drop(data_stream);

    info!("Directory listing of {:?} sent successfully.", target);
    send_response(writer, responses::TRANSFER_COMPLETE).await
}

async fn build_listing(target: &Path, names_only: bool) -> std::io::Result<String> {
    let metadata = fs::metadata(target).await?;
    let mut entries = Vec::new();

    if metadata.is_dir() {
        let mut dir = fs::read_dir(target).await?;
        while let Some(entry) = dir.next_entry().await? {
            match entry.metadata().await {
                Ok(metadata) => {
                    entries.push((entry.file_name().to_string_lossy().into_owned(), metadata))
                }
                Err(e) => warn!(
                    "Failed to get metadata for entry: {:?}, error: {:?}",
                    entry.path(),
                    e
                ),
            }
        }
    } else {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        entries.push((name, metadata));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut listing = String::new();
    for (name, metadata) in &entries {
        if names_only {
            listing.push_str(name);
        } else {
            listing.push_str(&format_list_entry(name, metadata));
        }
        listing.push_str("\r\n");
    }
    Ok(listing)
}

/// Formats one `ls -l` style line, without the line terminator.
pub fn format_list_entry(name: &str, metadata: &Metadata) -> String {
    let file_type = if metadata.is_dir() { 'd' } else { '-' };
    let date = metadata
        .modified()
        .map(|m| format_list_date(DateTime::<Local>::from(m)))
        .unwrap_or_else(|_| "Jan 01 00:00".to_string());
    format!(
        "{}{} 1 owner group {:>12} {} {}",
        file_type,
        permission_string(metadata),
        metadata.len(),
        date,
        name
    )
}

fn format_list_date(modified: DateTime<Local>) -> String {
    if modified.year() == Local::now().year() {
        modified.format("%b %d %H:%M").to_string()
    } else {
        modified.format("%b %d  %Y").to_string()
    }
}

#[cfg(unix)]
fn permission_string(metadata: &Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    let mode = metadata.permissions().mode();
    let flags = ['r', 'w', 'x'];
    (0..9)
        .map(|i| {
            if mode & (0o400 >> i) != 0 {
                flags[i % 3]
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(not(unix))]
fn permission_string(metadata: &Metadata) -> String {
    if metadata.permissions().readonly() {
        "r--r--r--".to_string()
    } else {
        "rw-rw-rw-".to_string()
    }
}
