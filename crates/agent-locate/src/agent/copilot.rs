//! GitHub Copilot agent paths.
//!
//! Copilot stores its configuration in:
//! - **Global**: `~/.copilot/`
//! - **Project**: `.github/` in project root (shared with other GitHub
//!   tooling, so writes must stay inside `skills/`)

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;

/// Project-local directory name.
pub const PROJECT_DIRNAME: &str = ".github";

/// Returns the global Copilot configuration directory (`~/.copilot/`).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn global_config_dir() -> Result<PathBuf> {
    Ok(platform::home_dir()?.join(".copilot"))
}

/// Returns the project-local Copilot configuration directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIRNAME)
}

/// Checks if Copilot is installed on this system.
pub fn is_installed() -> bool {
    global_config_dir().map(|p| p.exists()).unwrap_or(false)
}
