use crate::constants::{
    DEFAULT_DOWNLOAD_BUFFER_SIZE, DEFAULT_UPLOAD_BUFFER_SIZE, PASV_ACCEPT_TIMEOUT, USERNAME_REGEX,
};
use crate::core_auth::account::Permission;
use anyhow::{bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_address: Option<Ipv4Addr>, // Advertised PASV IP, else the control socket's local IP
    pub banner: String,
    pub idle_timeout: u64,    // seconds
    pub connect_timeout: u64, // seconds, PORT/EPRT dial-out
    pub pasv_timeout: u64,    // seconds a transfer waits for the passive data connection
    pub max_connections: usize,
    pub upload_buffer_size: Option<usize>,
    pub download_buffer_size: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: 2121,
            pasv_address: None,
            banner: String::from("Welcome to vfsftpd."),
            idle_timeout: 300,
            connect_timeout: 10,
            pasv_timeout: PASV_ACCEPT_TIMEOUT.as_secs(),
            max_connections: 50,
            upload_buffer_size: Some(DEFAULT_UPLOAD_BUFFER_SIZE),
            download_buffer_size: Some(DEFAULT_DOWNLOAD_BUFFER_SIZE),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AclConfig {
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountConfig {
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub home: PathBuf,
    #[serde(default)]
    pub permission: Permission,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MountConfig {
    pub virtual_path: String,
    pub physical_path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// Per-command enable flags, keyed by the uppercase command token.
    pub commands: HashMap<String, bool>,
    pub acl: AclConfig,
    pub accounts: Vec<AccountConfig>,
    pub mounts: Vec<MountConfig>,
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(config_str)?;

        // Set defaults if not specified
        if config.server.upload_buffer_size.is_none() {
            config.server.upload_buffer_size = Some(DEFAULT_UPLOAD_BUFFER_SIZE);
        }
        if config.server.download_buffer_size.is_none() {
            config.server.download_buffer_size = Some(DEFAULT_DOWNLOAD_BUFFER_SIZE);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let username_re = Regex::new(USERNAME_REGEX)?;
        let mut seen = HashSet::new();
        for account in &self.accounts {
            if !username_re.is_match(&account.username) {
                bail!("Invalid username in accounts table: {:?}", account.username);
            }
            if !seen.insert(account.username.clone()) {
                bail!("Duplicate account: {}", account.username);
            }
        }
        for mount in &self.mounts {
            if !mount.virtual_path.starts_with('/') {
                bail!("Mount virtual path must be absolute: {}", mount.virtual_path);
            }
        }
        if self.server.max_connections == 0 {
            bail!("server.max_connections must be at least 1");
        }
        if self.server.upload_buffer_size == Some(0) {
            bail!("server.upload_buffer_size must be at least 1");
        }
        if self.server.download_buffer_size == Some(0) {
            bail!("server.download_buffer_size must be at least 1");
        }
        if self.server.pasv_timeout == 0 {
            bail!("server.pasv_timeout must be at least 1");
        }
        Ok(())
    }

    /// A command is enabled unless the `[commands]` table maps it to `false`.
    pub fn is_command_enabled(&self, token: &str) -> bool {
        self.commands
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map_or(true, |(_, enabled)| *enabled)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.server.idle_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.server.connect_timeout)
    }

    pub fn pasv_timeout(&self) -> Duration {
        Duration::from_secs(self.server.pasv_timeout)
    }
}
