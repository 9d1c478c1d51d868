use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Invalid password for user {0}")]
    InvalidPassword(String),

    #[error("Password supplied before user name")]
    MissingUser,
}

impl AuthError {
    pub fn to_ftp_response(&self) -> &'static [u8] {
        match self {
            AuthError::MissingUser => crate::responses::BAD_SEQUENCE,
            _ => crate::responses::NOT_LOGGED_IN,
        }
    }
}
