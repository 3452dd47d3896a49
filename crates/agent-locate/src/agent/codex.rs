//! OpenAI Codex agent paths.
//!
//! Codex stores its configuration in:
//! - **Global**: `~/.codex/`
//! - **Project**: `.codex/` in project root

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;

/// Project-local directory name.
pub const PROJECT_DIRNAME: &str = ".codex";

/// Returns the global Codex configuration directory (`~/.codex/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn global_config_dir() -> Result<PathBuf> {
    Ok(platform::home_dir()?.join(".codex"))
}

/// Returns the project-local Codex configuration directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIRNAME)
}

/// Checks if Codex is installed on this system.
pub fn is_installed() -> bool {
    global_config_dir().map(|p| p.exists()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_config_dir_is_relative_to_root() {
        let root = PathBuf::from("/some/project");
        assert_eq!(
            project_config_dir(&root),
            PathBuf::from("/some/project/.codex")
        );
    }
}
