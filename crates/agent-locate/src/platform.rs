//! Platform path helpers: home directory, `~` expansion, project roots.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Returns the current user's home directory.
///
/// # Errors
///
/// Returns [`Error::HomeNotFound`] if the home directory cannot be
/// determined.
pub fn home_dir() -> Result<PathBuf> {
    home::home_dir().ok_or(Error::HomeNotFound)
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a `~` prefix are returned unchanged.
///
/// # Errors
///
/// Returns [`Error::HomeNotFound`] if the path starts with `~` and the
/// home directory cannot be determined.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return home_dir();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

/// Finds the enclosing git repository root by walking up from `start`.
///
/// Returns `None` if no `.git` directory is found in `start` or any of
/// its ancestors.
#[must_use]
pub fn find_git_root(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(".git").exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
