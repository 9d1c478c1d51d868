use crate::constants::MAX_LINE_LENGTH;
use crate::core_ftpcommand::handlers::execute;
use crate::helpers::{format_banner, send_response};
use crate::responses;
use crate::server::{initialize_session, ServerContext};
use crate::session::Session;
use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

/// Accept loop: ACL gate, connection cap, then one task per session.
pub async fn start_server(
    listener: TcpListener,
    context: Arc<ServerContext>,
    shutdown: CancellationToken,
) -> Result<()> {
    let slots = Arc::new(Semaphore::new(context.config.server.max_connections));

    loop {
        let (socket, addr) = tokio::select! {
            _ = shutdown.cancelled() => {
                info!("Shutdown requested, no longer accepting connections.");
                return Ok(());
            }
            accepted = listener.accept() => match accepted {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    continue;
                }
            }
        };

        if !context.acl.is_allowed(&addr) {
            warn!("Connection from {} denied by access rules", addr);
            drop(socket);
            continue;
        }

        let permit = match Arc::clone(&slots).try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, refusing {}", addr);
                let mut socket = socket;
                tokio::spawn(async move {
                    let _ = socket.write_all(responses::TOO_MANY_CONNECTIONS).await;
                    let _ = socket.shutdown().await;
                });
                continue;
            }
        };

        info!("New connection from {}", addr);
        let context = Arc::clone(&context);
        let shutdown = shutdown.child_token();

        tokio::spawn(async move {
            let _permit = permit;
            let local_addr = match socket.local_addr() {
                Ok(local_addr) => local_addr,
                Err(e) => {
                    error!("Failed to read local address for {}: {}", addr, e);
                    return;
                }
            };
            let session = initialize_session(&context, addr, local_addr);
            if let Err(e) = handle_connection(socket, session, shutdown).await {
                error!("Connection error for {}: {:?}", addr, e);
            }
            info!("Connection closed for {}", addr);
        });
    }
}

/// Outcome of reading one control line.
enum LineRead {
    Line,
    Eof,
    TooLong,
}

async fn read_control_line<R>(reader: &mut R, line: &mut String) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    let n = reader.take(MAX_LINE_LENGTH).read_line(line).await?;
    if n == 0 {
        return Ok(LineRead::Eof);
    }
    if !line.ends_with('\n') && n as u64 >= MAX_LINE_LENGTH {
        return Ok(LineRead::TooLong);
    }
    Ok(LineRead::Line)
}

/// Runs one control session to completion.
///
/// The stream may be plain TCP or an already upgraded wrapper around it.
/// Whatever ends the session, the data channel is closed on the way out.
pub async fn handle_connection<S>(
    stream: S,
    mut session: Session,
    shutdown: CancellationToken,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let (read_half, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);
    let idle_timeout = session.context.config.idle_timeout();

    let banner = format_banner(&session.context.config.server.banner);
    send_response(&mut writer, banner.as_bytes()).await?;

    let mut line = String::new();
    let result = loop {
        line.clear();

        let read = tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = send_response(&mut writer, responses::SERVICE_SHUTTING_DOWN).await;
                break Ok(());
            }
            read = tokio::time::timeout(
                idle_timeout,
                read_control_line(&mut reader, &mut line),
            ) => read,
        };

        match read {
            Err(_) => {
                info!("Session {} idle for {:?}, closing", session.remote_addr(), idle_timeout);
                let _ = send_response(&mut writer, responses::IDLE_TIMEOUT).await;
                break Ok(());
            }
            Ok(Err(e)) => break Err(e.into()),
            Ok(Ok(LineRead::Eof)) => {
                debug!("Client {} disconnected", session.remote_addr());
                break Ok(());
            }
            Ok(Ok(LineRead::TooLong)) => {
                warn!("Oversized control line from {}, disconnecting", session.remote_addr());
                break Ok(());
            }
            Ok(Ok(LineRead::Line)) => {}
        }

        if line.trim().is_empty() {
            continue;
        }

        let keep_going = tokio::select! {
            _ = shutdown.cancelled() => {
                let _ = send_response(&mut writer, responses::SERVICE_SHUTTING_DOWN).await;
                break Ok(());
            }
            outcome = execute(&mut writer, &mut session, &line) => outcome,
        };
        match keep_going {
            Ok(true) => {}
            Ok(false) => break Ok(()),
            Err(e) => break Err(e.into()),
        }
    };

    session.data.close();
    let _ = writer.shutdown().await;
    result
}
