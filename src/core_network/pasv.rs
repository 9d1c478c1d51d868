use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{debug, error, info, trace};
use std::net::{IpAddr, Ipv4Addr};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Handles PASV (and EPSV, which answers the same way).
///
/// Any previous data channel is discarded, a listener is opened on an
/// ephemeral port and the reply is sent right away. The accept itself runs in
/// the background and resolves the session's one-shot accept signal.
pub async fn handle_pasv_command(
    writer: &mut ControlWriter,
    session: &mut Session,
) -> Result<(), std::io::Error> {
    session.data.close();

    let bind_ip = passive_bind_ip(session.local_addr().ip());
    let listener = match setup_pasv_listener(bind_ip).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to open passive listener on {}: {}", bind_ip, e);
            return send_response(writer, responses::CANT_OPEN_DATA).await;
        }
    };
    let port = listener.local_addr()?.port();
    let advertised = advertised_ip(session.context.config.server.pasv_address, bind_ip);

    let (signal_tx, signal_rx) = oneshot::channel();
    let user = session.user_label().to_string();
    let task = tokio::spawn(async move {
        let outcome = accept_pasv_connection(listener).await;
        match &outcome {
            Ok(_) => trace!("[{}] Passive data connection accepted", user),
            Err(e) => error!("[{}] Failed to accept data connection: {}", user, e),
        }
        // The control loop may have moved on; nobody waiting is fine.
        let _ = signal_tx.send(outcome);
    });
    session.data.set_pending(signal_rx, task);

    info!(
        "[{}] Passive mode on {}:{} (advertised {})",
        session.user_label(),
        bind_ip,
        port,
        advertised
    );
    send_response(writer, format_pasv_response(advertised, port).as_bytes()).await
}

/// Passive listeners live on the address the client already reached us on.
pub fn passive_bind_ip(local: IpAddr) -> IpAddr {
    match local.to_canonical() {
        IpAddr::V4(ip) => IpAddr::V4(ip),
        IpAddr::V6(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    }
}

/// The configured override wins; a wildcard bind is advertised as loopback.
pub fn advertised_ip(pasv_override: Option<Ipv4Addr>, bind_ip: IpAddr) -> Ipv4Addr {
    if let Some(ip) = pasv_override {
        return ip;
    }
    match bind_ip {
        IpAddr::V4(ip) if !ip.is_unspecified() => ip,
        _ => Ipv4Addr::LOCALHOST,
    }
}

pub fn format_pasv_response(ip: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}).\r\n",
        h1,
        h2,
        h3,
        h4,
        port >> 8,
        port & 0xff
    )
}

/// Sets up a passive mode listener on an ephemeral port.
pub async fn setup_pasv_listener(bind_ip: IpAddr) -> Result<TcpListener, std::io::Error> {
    let listener = TcpListener::bind((bind_ip, 0)).await?;
    debug!("PASV listener set up on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accepts the incoming connection on the passive listener, then drops the listener.
pub async fn accept_pasv_connection(listener: TcpListener) -> Result<TcpStream, std::io::Error> {
    let (data_stream, addr) = listener.accept().await?;
    debug!("Accepted data connection from: {}", addr);
    Ok(data_stream)
}
