// src/constants.rs

use std::time::Duration;

pub const USERNAME_REGEX: &str = r"^[a-zA-Z0-9_.@-]{1,32}$";

/// Arguments longer than this drop the control connection without a reply.
pub const MAX_ARGUMENT_LENGTH: usize = 128;
/// Upper bound for a raw control line, terminator included.
pub const MAX_LINE_LENGTH: u64 = 1024;

pub const PASV_ACCEPT_TIMEOUT: Duration = Duration::from_secs(30);

/// PORT/EPRT targets below this are refused.
pub const MIN_DATA_PORT: u16 = 1024;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/vfsftpd.toml";
pub const DEFAULT_UPLOAD_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DOWNLOAD_BUFFER_SIZE: usize = 128 * 1024;
