//! Claude Code agent paths.
//!
//! Claude Code stores its configuration in:
//! - **Global**: `$CLAUDE_CONFIG_DIR` or `~/.claude/`
//! - **Project**: `.claude/` in project root

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;

/// Environment variable for Claude Code config directory override.
const CLAUDE_CONFIG_DIR_ENV: &str = "CLAUDE_CONFIG_DIR";

/// Returns the global Claude Code configuration directory.
///
/// Checks `CLAUDE_CONFIG_DIR` first, then falls back to `~/.claude/`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined and no
/// environment variable is set.
pub fn global_config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(CLAUDE_CONFIG_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.is_absolute() {
            return Ok(path);
        }
    }

    Ok(platform::home_dir()?.join(".claude"))
}

/// Returns the project-local Claude Code configuration directory.
#[must_use]
pub fn project_config_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIRNAME)
}

/// Project-local directory name.
pub const PROJECT_DIRNAME: &str = ".claude";

/// Checks if Claude Code is installed on this system.
///
/// Currently checks if the global config directory exists.
pub fn is_installed() -> bool {
    global_config_dir().map(|p| p.exists()).unwrap_or(false)
}
