use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum VfsError {
    #[error("Path escapes the home directory: {0:?}")]
    OutsideHome(PathBuf),

    #[error("Path escapes the mounted directory: {0:?}")]
    OutsideMount(PathBuf),

    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Already at the home directory root")]
    AtRoot,

    #[error("Empty path")]
    EmptyPath,
}
