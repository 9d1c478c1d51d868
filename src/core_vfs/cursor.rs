use crate::core_vfs::error::VfsError;
use crate::core_vfs::mount::{Mount, MountRegistry};
use crate::core_vfs::path::{display_below, normalize_path};
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Per-session navigator over the account's home tree and its mounts.
///
/// The physical path is always a descendant of the home directory or, while a
/// mount is active, of that mount's physical directory. Every candidate path is
/// lexically normalized first and only then prefix-tested against those roots.
#[derive(Debug, Clone)]
pub struct VirtualCursor {
    home: PathBuf,
    current: PathBuf,
    mounts: Arc<MountRegistry>,
    active_mount: Option<usize>,
}

impl VirtualCursor {
    pub fn new(home: PathBuf, mounts: Arc<MountRegistry>) -> Self {
        let home = normalize_path(&home);
        Self {
            current: home.clone(),
            home,
            mounts,
            active_mount: None,
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn physical_path(&self) -> &Path {
        &self.current
    }

    pub fn active_mount(&self) -> Option<&Mount> {
        self.active_mount.and_then(|index| self.mounts.get(index))
    }

    pub fn is_at_root(&self) -> bool {
        self.current == self.home
    }

    /// The display path of the current directory.
    pub fn virtual_path(&self) -> String {
        self.virtual_path_of(&self.current)
    }

    /// Display path of any physical path reachable from this cursor.
    pub fn virtual_path_of(&self, physical: &Path) -> String {
        if let Some(mount) = self.active_mount() {
            if let Some(shown) = display_below(mount.virtual_prefix(), mount.physical(), physical) {
                return shown;
            }
        }
        display_below("", &self.home, physical).unwrap_or_else(|| "/".to_string())
    }

    pub fn navigate(&mut self, arg: &str) -> Result<(), VfsError> {
        if arg.is_empty() {
            return Err(VfsError::EmptyPath);
        }

        if arg.starts_with('/') {
            let target = self.resolve_absolute(arg)?;
            ensure_directory(&target)?;
            debug!("Absolute navigation to {:?}", target);
            self.current = target;
            self.active_mount = None;
            return Ok(());
        }

        match arg {
            "." => Ok(()),
            ".." => {
                if self.is_at_root() {
                    return Err(VfsError::AtRoot);
                }
                let parent = match self.current.parent() {
                    Some(parent) => parent.to_path_buf(),
                    None => return Err(VfsError::AtRoot),
                };
                if !parent.starts_with(&self.home) {
                    return Err(VfsError::OutsideHome(parent));
                }
                if let Some(mount) = self.active_mount() {
                    if !mount.contains(&parent) {
                        debug!("Leaving mount {}", mount.virtual_prefix());
                        self.active_mount = None;
                    }
                }
                self.current = parent;
                Ok(())
            }
            name => {
                let target = self.resolve_relative(name)?;
                ensure_directory(&target)?;
                if self.active_mount.is_none() {
                    self.active_mount = self.mounts.find_containing(&target);
                    if let Some(mount) = self.active_mount() {
                        debug!("Entering mount {}", mount.virtual_prefix());
                    }
                }
                self.current = target;
                Ok(())
            }
        }
    }

    /// Resolves `name` the way [`navigate`](Self::navigate) would, without
    /// requiring the target to exist. A file can never be the home root.
    pub fn create_path(&self, name: &str, is_directory: bool) -> Result<PathBuf, VfsError> {
        if name.is_empty() {
            return Err(VfsError::EmptyPath);
        }
        let target = if name.starts_with('/') {
            self.resolve_absolute(name)?
        } else {
            self.resolve_relative(name)?
        };
        if !is_directory && target == self.home {
            return Err(VfsError::OutsideHome(target));
        }
        Ok(target)
    }

    fn resolve_absolute(&self, arg: &str) -> Result<PathBuf, VfsError> {
        let target = normalize_path(&self.home.join(arg.trim_start_matches('/')));
        if !target.starts_with(&self.home) {
            return Err(VfsError::OutsideHome(target));
        }
        Ok(target)
    }

    fn resolve_relative(&self, name: &str) -> Result<PathBuf, VfsError> {
        let target = normalize_path(&self.current.join(name));
        match self.active_mount() {
            Some(mount) if !mount.contains(&target) => Err(VfsError::OutsideMount(target)),
            Some(_) => Ok(target),
            None if !target.starts_with(&self.home) => Err(VfsError::OutsideHome(target)),
            None => Ok(target),
        }
    }
}

fn ensure_directory(path: &Path) -> Result<(), VfsError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(VfsError::NotADirectory(path.to_path_buf()))
    }
}
