pub mod cursor;
pub mod error;
pub mod mount;
pub mod path;

pub use cursor::VirtualCursor;
pub use error::VfsError;
pub use mount::{Mount, MountRegistry};
