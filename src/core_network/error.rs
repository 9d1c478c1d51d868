use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataChannelError {
    #[error("No data connection established")]
    NoConnection,

    #[error("Timed out waiting for the passive data connection")]
    AcceptTimeout,

    #[error("Passive data connection was abandoned")]
    AcceptAborted,

    #[error("Failed to accept data connection: {0}")]
    Accept(#[source] std::io::Error),

    #[error("Malformed host-port argument: {0}")]
    Syntax(String),

    #[error("Data port {0} is outside the permitted range")]
    PortOutOfRange(u16),

    #[error("PORT target {target} does not match control peer {peer}")]
    BounceAttempt { target: Ipv4Addr, peer: IpAddr },
}

impl DataChannelError {
    pub fn to_ftp_response(&self) -> &'static [u8] {
        match self {
            DataChannelError::Syntax(_) | DataChannelError::PortOutOfRange(_) => {
                crate::responses::SYNTAX_ERROR
            }
            DataChannelError::BounceAttempt { .. } => crate::responses::PORT_REFUSED,
            _ => crate::responses::CANT_OPEN_DATA,
        }
    }
}
