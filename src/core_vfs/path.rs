use std::path::{Component, Path, PathBuf};

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

pub fn absolute_normalized(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&absolute)
}

/// Renders the part of `path` below `root` with `/` separators, prefixed by `prefix`.
pub fn display_below(prefix: &str, root: &Path, path: &Path) -> Option<String> {
    let remainder = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = remainder
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let prefix = prefix.trim_end_matches('/');
    if parts.is_empty() {
        return Some(if prefix.is_empty() { "/".to_string() } else { prefix.to_string() });
    }
    Some(format!("{}/{}", prefix, parts.join("/")))
}
