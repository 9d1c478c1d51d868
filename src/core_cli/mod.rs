use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "vfsftpd", about = "An FTP server with virtual homes and mounts.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate the configuration and exit
    #[arg(long)]
    pub check_config: bool,

    /// Print a bcrypt hash of the given password for use in an account entry, then exit
    #[arg(long, value_name = "PASSWORD")]
    pub hash_password: Option<String>,
}

impl Cli {
    /// The configuration path to load, falling back to the system default.
    pub fn config_path(&self) -> &str {
        if self.config.is_empty() {
            crate::constants::DEFAULT_CONFIG_PATH
        } else {
            self.config.as_str()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["vfsftpd"]);
        assert!(!cli.verbose);
        assert!(!cli.check_config);
        assert_eq!(cli.config_path(), crate::constants::DEFAULT_CONFIG_PATH);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "vfsftpd",
            "-c",
            "/tmp/ftp.toml",
            "-v",
            "--hash-password",
            "s3cret",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config_path(), "/tmp/ftp.toml");
        assert_eq!(cli.hash_password.as_deref(), Some("s3cret"));
    }
}
