//! OpenCode agent paths.
//!
//! OpenCode stores its configuration in:
//! - **Global**: `~/.config/opencode/`
//! - **Project**: `.opencode/` in project root

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;

/// Project-local directory name.
pub const PROJECT_DIRNAME: &str = ".opencode";

/// Returns the global OpenCode configuration directory
/// (`~/.config/opencode/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn global_config_dir() -> Result<PathBuf> {
    Ok(platform::home_dir()?.join(".config").join("opencode"))
}

/// Returns the project-local OpenCode configuration directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIRNAME)
}

/// Checks if OpenCode is installed on this system.
pub fn is_installed() -> bool {
    global_config_dir().map(|p| p.exists()).unwrap_or(false)
}
