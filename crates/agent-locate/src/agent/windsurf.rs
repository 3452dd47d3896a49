//! Windsurf agent paths.
//!
//! Windsurf stores its configuration in:
//! - **Global**: `~/.codeium/windsurf/`
//! - **Project**: `.windsurf/` in project root

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;

/// Project-local directory name.
pub const PROJECT_DIRNAME: &str = ".windsurf";

/// Returns the global Windsurf configuration directory
/// (`~/.codeium/windsurf/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn global_config_dir() -> Result<PathBuf> {
    Ok(platform::home_dir()?.join(".codeium").join("windsurf"))
}

/// Returns the project-local Windsurf configuration directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIRNAME)
}

/// Checks if Windsurf is installed on this system.
pub fn is_installed() -> bool {
    global_config_dir().map(|p| p.exists()).unwrap_or(false)
}
