pub mod config;
pub mod constants;
pub mod core_acl;
pub mod core_auth;
pub mod core_cli;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod core_vfs;
pub mod helpers;
pub mod responses;
pub mod server;
pub mod session;
