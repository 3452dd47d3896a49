//! Google Antigravity agent paths.
//!
//! Antigravity stores its configuration in:
//! - **Global**: `~/.gemini/antigravity/`
//! - **Project**: `.agent/` in project root

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;

/// Project-local directory name.
pub const PROJECT_DIRNAME: &str = ".agent";

/// Returns the global Antigravity configuration directory
/// (`~/.gemini/antigravity/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn global_config_dir() -> Result<PathBuf> {
    Ok(platform::home_dir()?.join(".gemini").join("antigravity"))
}

/// Returns the project-local Antigravity configuration directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIRNAME)
}

/// Checks if Antigravity is installed on this system.
pub fn is_installed() -> bool {
    global_config_dir().map(|p| p.exists()).unwrap_or(false)
}
