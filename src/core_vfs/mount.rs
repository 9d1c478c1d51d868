use crate::config::MountConfig;
use crate::core_vfs::path::absolute_normalized;
use std::path::{Path, PathBuf};

/// A virtual folder: a display prefix mapped onto a physical directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    virtual_prefix: String,
    physical: PathBuf,
}

impl Mount {
    pub fn new(virtual_prefix: &str, physical: PathBuf) -> Self {
        let trimmed = virtual_prefix.trim_end_matches('/');
        let virtual_prefix = if trimmed.is_empty() {
            "/".to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            virtual_prefix,
            physical,
        }
    }

    pub fn virtual_prefix(&self) -> &str {
        &self.virtual_prefix
    }

    pub fn physical(&self) -> &Path {
        &self.physical
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.physical)
    }
}

/// Static list of mounts, shared read-only by every session.
#[derive(Debug, Default)]
pub struct MountRegistry {
    mounts: Vec<Mount>,
}

impl MountRegistry {
    pub fn new(mounts: Vec<Mount>) -> Self {
        Self { mounts }
    }

    pub fn from_config(entries: &[MountConfig]) -> Self {
        Self::new(
            entries
                .iter()
                .map(|m| Mount::new(&m.virtual_path, absolute_normalized(&m.physical_path)))
                .collect(),
        )
    }

    pub fn get(&self, index: usize) -> Option<&Mount> {
        self.mounts.get(index)
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Index of the most specific mount whose physical directory holds `path`.
    pub fn find_containing(&self, path: &Path) -> Option<usize> {
        self.mounts
            .iter()
            .enumerate()
            .filter(|(_, m)| m.contains(path))
            .max_by_key(|(_, m)| m.physical.components().count())
            .map(|(index, _)| index)
    }
}
