use crate::constants::MIN_DATA_PORT;
use crate::core_network::error::DataChannelError;
use crate::helpers::{send_response, ControlWriter};
use crate::responses;
use crate::session::Session;
use log::{error, info, warn};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::Duration;
use tokio::net::TcpStream;

/// Parses an `h1,h2,h3,h4,p1,p2` host-port argument.
///
/// Checks run in order: six byte tokens, then the port range, then the address.
pub fn parse_port_argument(arg: &str) -> Result<SocketAddrV4, DataChannelError> {
    let parts: Vec<&str> = arg.trim().split(',').collect();
    if parts.len() != 6 {
        return Err(DataChannelError::Syntax(arg.to_string()));
    }
    let mut bytes = [0u8; 6];
    for (slot, part) in bytes.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<u8>()
            .map_err(|_| DataChannelError::Syntax(arg.to_string()))?;
    }

    let port = (u16::from(bytes[4]) << 8) | u16::from(bytes[5]);
    if port < MIN_DATA_PORT {
        return Err(DataChannelError::PortOutOfRange(port));
    }

    let ip = Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]);
    if ip.is_unspecified() || ip.is_broadcast() || ip.is_multicast() {
        return Err(DataChannelError::Syntax(arg.to_string()));
    }
    Ok(SocketAddrV4::new(ip, port))
}

/// Refuses any target other than the control connection's own peer.
pub fn check_bounce(target: &SocketAddrV4, peer: IpAddr) -> Result<(), DataChannelError> {
    if IpAddr::V4(*target.ip()) == peer.to_canonical() {
        Ok(())
    } else {
        Err(DataChannelError::BounceAttempt {
            target: *target.ip(),
            peer,
        })
    }
}

/// Dials the client's data port, bounded by `limit`.
pub async fn setup_port_connection(
    target: SocketAddrV4,
    limit: Duration,
) -> Result<TcpStream, std::io::Error> {
    match tokio::time::timeout(limit, TcpStream::connect(SocketAddr::V4(target))).await {
        Ok(result) => result,
        Err(_) => Err(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            format!("connect to {} timed out", target),
        )),
    }
}

/// Handles PORT (and EPRT, which takes the same argument form here).
///
/// A refused or malformed request leaves any existing data channel untouched.
/// A failed dial is only reported when the next transfer command runs.
pub async fn handle_port_command(
    writer: &mut ControlWriter,
    session: &mut Session,
    arg: String,
) -> Result<(), std::io::Error> {
    let target = match parse_port_argument(&arg)
        .and_then(|target| check_bounce(&target, session.remote_addr().ip()).map(|_| target))
    {
        Ok(target) => target,
        Err(e @ DataChannelError::BounceAttempt { .. }) => {
            warn!(
                "[{}] Possible bounce attack refused: {}",
                session.user_label(),
                e
            );
            return send_response(writer, e.to_ftp_response()).await;
        }
        Err(e) => {
            warn!("[{}] Invalid PORT argument: {}", session.user_label(), e);
            return send_response(writer, e.to_ftp_response()).await;
        }
    };

    session.data.close();
    info!("Received PORT command with target {}", target);

    match setup_port_connection(target, session.context.config.connect_timeout()).await {
        Ok(data_stream) => {
            info!("Connection established with {}", target);
            session.data.set_stream(data_stream);
        }
        Err(e) => {
            error!("Failed to connect to client {}: {}", target, e);
        }
    }
    send_response(writer, responses::COMMAND_OK).await
}
