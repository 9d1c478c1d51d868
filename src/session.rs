use crate::core_auth::Account;
use crate::core_network::data_channel::DataChannel;
use crate::core_vfs::VirtualCursor;
use crate::server::ServerContext;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferType {
    #[default]
    Ascii,
    Binary,
}

impl TransferType {
    pub fn code(&self) -> char {
        match self {
            TransferType::Ascii => 'A',
            TransferType::Binary => 'I',
        }
    }
}

/// Per-connection state, owned by the control loop.
#[derive(Debug)]
pub struct Session {
    remote_addr: SocketAddr,
    local_addr: SocketAddr,
    pub context: Arc<ServerContext>,
    pub username: Option<String>, // Set by USER
    pub account: Option<Account>, // Set by a successful PASS
    pub cursor: Option<VirtualCursor>,
    pub transfer_type: TransferType,
    pub rename_from: Option<PathBuf>,
    pub data: DataChannel,
}

impl Session {
    pub fn new(
        context: Arc<ServerContext>,
        remote_addr: SocketAddr,
        local_addr: SocketAddr,
    ) -> Self {
        Self {
            remote_addr,
            local_addr,
            context,
            username: None,
            account: None,
            cursor: None,
            transfer_type: TransferType::default(),
            rename_from: None,
            data: DataChannel::new(),
        }
    }

    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_authenticated(&self) -> bool {
        self.account.is_some()
    }

    /// Attaches the account and places a fresh cursor at its home directory.
    pub fn login(&mut self, account: Account) {
        let cursor = VirtualCursor::new(account.home().clone(), Arc::clone(&self.context.mounts));
        self.cursor = Some(cursor);
        self.account = Some(account);
    }

    /// Display name for log lines.
    pub fn user_label(&self) -> &str {
        self.account
            .as_ref()
            .map(|a| a.username())
            .or(self.username.as_deref())
            .unwrap_or("-")
    }
}
