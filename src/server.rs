use crate::config::Config;
use crate::core_acl::{AccessPolicy, IpRules};
use crate::core_auth::AccountDirectory;
use crate::core_network::network;
use crate::core_vfs::MountRegistry;
use crate::session::Session;
use anyhow::{Context, Result};
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Everything sessions share. Read-only once built.
#[derive(Debug)]
pub struct ServerContext {
    pub config: Config,
    pub accounts: AccountDirectory,
    pub mounts: Arc<MountRegistry>,
    pub acl: Box<dyn AccessPolicy>,
}

impl ServerContext {
    pub fn from_config(config: Config) -> Result<Self> {
        let acl = IpRules::from_config(&config.acl).context("Invalid ACL configuration")?;
        let accounts = AccountDirectory::from_config(&config.accounts);
        let mounts = Arc::new(MountRegistry::from_config(&config.mounts));
        Ok(Self {
            config,
            accounts,
            mounts,
            acl: Box::new(acl),
        })
    }
}

pub fn initialize_session(
    context: &Arc<ServerContext>,
    remote_addr: SocketAddr,
    local_addr: SocketAddr,
) -> Session {
    Session::new(Arc::clone(context), remote_addr, local_addr)
}

/// A bound control listener, ready to serve.
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl Server {
    pub async fn bind(config: Config) -> Result<Self> {
        let addr = format!("{}:{}", config.server.listen_address, config.server.listen_port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind control listener on {}", addr))?;
        let context = Arc::new(ServerContext::from_config(config)?);
        Ok(Self { listener, context })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        info!("Listening on {}", self.local_addr()?);
        info!(
            "{} account(s), {} mount(s), max {} connection(s)",
            self.context.accounts.len(),
            self.context.mounts.len(),
            self.context.config.server.max_connections
        );
        network::start_server(self.listener, self.context, shutdown).await
    }
}

/// Binds and runs the FTP server with the provided configuration.
pub async fn run(config: Config, shutdown: CancellationToken) -> Result<()> {
    let server = Server::bind(config).await?;
    match server.run(shutdown).await {
        Ok(_) => {
            info!("Server stopped.");
            Ok(())
        }
        Err(e) => {
            error!("Server failed: {}", e);
            Err(e)
        }
    }
}
