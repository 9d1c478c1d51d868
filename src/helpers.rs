use log::{error, trace};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Write side of the control connection. Plain TCP or an upgraded stream alike.
pub type ControlWriter = dyn AsyncWrite + Unpin + Send;

/// Sends a response to the client.
pub async fn send_response(
    writer: &mut ControlWriter,
    message: &[u8],
) -> Result<(), std::io::Error> {
    trace!("> {}", String::from_utf8_lossy(message).trim_end());
    if let Err(e) = writer.write_all(message).await {
        error!("Failed to send response: {}", e);
        return Err(e);
    }
    writer.flush().await
}

/// Sends `first` and `lines` as an RFC 959 multi-line reply closed by `last`.
pub async fn send_multiline_response(
    writer: &mut ControlWriter,
    code: u16,
    first: &str,
    lines: &[&str],
    last: &str,
) -> Result<(), std::io::Error> {
    let mut reply = format!("{}-{}\r\n", code, first);
    for line in lines {
        reply.push_str(&format!(" {}\r\n", line));
    }
    reply.push_str(&format!("{} {}\r\n", code, last));
    send_response(writer, reply.as_bytes()).await
}

/// Formats the greeting, turning a multi-line banner into `220-` continuations.
pub fn format_banner(banner: &str) -> String {
    let lines: Vec<&str> = banner.lines().filter(|l| !l.trim().is_empty()).collect();
    match lines.split_last() {
        None => "220 Service ready for new user.\r\n".to_string(),
        Some((last, rest)) => {
            let mut greeting = String::new();
            for line in rest {
                greeting.push_str(&format!("220-{}\r\n", line));
            }
            greeting.push_str(&format!("220 {}\r\n", last));
            greeting
        }
    }
}
