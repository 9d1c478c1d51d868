use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AclError {
    #[error("Invalid address pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid CIDR prefix length in: {0}")]
    InvalidPrefix(String),
}
