use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use tokio_util::sync::CancellationToken;
use vfsftpd::config::Config;
use vfsftpd::core_auth::password::hash_password;
use vfsftpd::core_cli::Cli;
use vfsftpd::core_log::logger::init_logger;
use vfsftpd::server;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(password) = &args.hash_password {
        let hashed = hash_password(password).context("Failed to hash password")?;
        println!("{}", hashed);
        return Ok(());
    }

    init_logger(args.verbose);

    let config_path = args.config_path();
    let config = Config::load_from_file(config_path)?;
    info!("Loaded configuration from {}", config_path);

    if args.check_config {
        println!("Configuration {} is valid.", config_path);
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupt received, shutting down."),
            Err(e) => warn!("Unable to listen for interrupt signal: {}", e),
        }
        signal_token.cancel();
    });

    server::run(config, shutdown).await
}
