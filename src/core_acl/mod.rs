pub mod error;
pub mod rules;

pub use error::AclError;
pub use rules::{AccessPolicy, IpPattern, IpRules};
