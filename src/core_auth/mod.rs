pub mod account;
pub mod directory;
pub mod error;
pub mod password;

pub use account::{Account, Permission};
pub use directory::AccountDirectory;
pub use error::AuthError;
