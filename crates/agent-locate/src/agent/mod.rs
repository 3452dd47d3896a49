//! Agent path resolution, skill writing, and health checks.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::platform;
use crate::types::{AdapterStatus, AgentConfig, AgentKind, ProjectPathStatus};
use crate::write;

pub mod antigravity;
pub mod claude;
pub mod codex;
pub mod copilot;
pub mod cursor;
pub mod gemini;
pub mod opencode;
pub mod qoder;
pub mod windsurf;

/// Name of the agent-agnostic shared directory at a project root.
pub const SHARED_DIRNAME: &str = ".agents";

/// Returns the shared `.agents` directory at the project's git root, if
/// it holds a `skills/` subdirectory.
///
/// The shared path is agent-agnostic and has the highest discovery
/// priority. It is only reported when it actually exists.
#[must_use]
pub fn shared_path(start_dir: &Path) -> Option<PathBuf> {
    let root = platform::find_git_root(start_dir)?;
    let agents_dir = root.join(SHARED_DIRNAME);
    if agents_dir.join("skills").is_dir() {
        Some(agents_dir)
    } else {
        None
    }
}

/// One agent adapter: path resolution and skill writing for a single
/// agent kind, parameterized by its configuration.
#[derive(Debug, Clone)]
pub struct Agent {
    kind: AgentKind,
    config: AgentConfig,
}

impl Agent {
    /// Creates an adapter with the default configuration (enabled, no
    /// path override).
    #[must_use]
    pub fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            config: AgentConfig::default(),
        }
    }

    /// Creates an adapter with an explicit configuration.
    #[must_use]
    pub fn with_config(kind: AgentKind, config: AgentConfig) -> Self {
        Self { kind, config }
    }

    /// Returns the kind of agent.
    #[must_use]
    pub fn kind(&self) -> AgentKind {
        self.kind
    }

    /// Stable agent identifier.
    #[must_use]
    pub fn id(&self) -> &'static str {
        self.kind.id()
    }

    /// Returns `true` if this adapter is enabled by configuration.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns `true` if the agent appears to be installed (its global
    /// config directory exists).
    #[must_use]
    pub fn is_installed(&self) -> bool {
        match self.kind {
            AgentKind::Claude => claude::is_installed(),
            AgentKind::Codex => codex::is_installed(),
            AgentKind::Copilot => copilot::is_installed(),
            AgentKind::Cursor => cursor::is_installed(),
            AgentKind::Gemini => gemini::is_installed(),
            AgentKind::OpenCode => opencode::is_installed(),
            AgentKind::Qoder => qoder::is_installed(),
            AgentKind::Windsurf => windsurf::is_installed(),
            AgentKind::Antigravity => antigravity::is_installed(),
        }
    }

    /// Returns the agent's global skills root: the configured override
    /// when set, the agent's default otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn global_path(&self) -> Result<PathBuf> {
        if let Some(ref override_path) = self.config.global_path {
            return platform::expand_home(override_path);
        }
        self.default_global_path()
    }

    fn default_global_path(&self) -> Result<PathBuf> {
        match self.kind {
            AgentKind::Claude => claude::global_config_dir(),
            AgentKind::Codex => codex::global_config_dir(),
            AgentKind::Copilot => copilot::global_config_dir(),
            AgentKind::Cursor => cursor::global_config_dir(),
            AgentKind::Gemini => gemini::global_config_dir(),
            AgentKind::OpenCode => opencode::global_config_dir(),
            AgentKind::Qoder => qoder::global_config_dir(),
            AgentKind::Windsurf => windsurf::global_config_dir(),
            AgentKind::Antigravity => antigravity::global_config_dir(),
        }
    }

    /// The project-local directory name for this agent (e.g. `.cursor`).
    #[must_use]
    pub fn project_dirname(&self) -> &'static str {
        match self.kind {
            AgentKind::Claude => claude::PROJECT_DIRNAME,
            AgentKind::Codex => codex::PROJECT_DIRNAME,
            AgentKind::Copilot => copilot::PROJECT_DIRNAME,
            AgentKind::Cursor => cursor::PROJECT_DIRNAME,
            AgentKind::Gemini => gemini::PROJECT_DIRNAME,
            AgentKind::OpenCode => opencode::PROJECT_DIRNAME,
            AgentKind::Qoder => qoder::PROJECT_DIRNAME,
            AgentKind::Windsurf => windsurf::PROJECT_DIRNAME,
            AgentKind::Antigravity => antigravity::PROJECT_DIRNAME,
        }
    }

    /// Returns the existing project-local configuration directories for
    /// this agent, looking at the enclosing git root and at `start_dir`
    /// itself.
    #[must_use]
    pub fn project_paths(&self, start_dir: &Path) -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(git_root) = platform::find_git_root(start_dir) {
            candidates.push(git_root);
        }
        if !candidates.iter().any(|c| c == start_dir) {
            candidates.push(start_dir.to_path_buf());
        }

        candidates
            .into_iter()
            .map(|dir| dir.join(self.project_dirname()))
            .filter(|p| p.is_dir())
            .collect()
    }

    /// Returns all search roots for this agent in priority order:
    /// project-local paths first, then the global path.
    ///
    /// The global path is included even when absent if
    /// `include_missing_global` is set (callers that create directories
    /// on write want it listed).
    #[must_use]
    pub fn search_paths(&self, start_dir: &Path, include_missing_global: bool) -> Vec<PathBuf> {
        let mut paths = self.project_paths(start_dir);
        match self.global_path() {
            Ok(global) => {
                if global.is_dir() || include_missing_global {
                    paths.push(global);
                }
            }
            Err(e) => {
                tracing::warn!(agent = self.id(), %e, "could not resolve global path");
            }
        }
        paths
    }

    /// Writes a skill into this agent's global layout:
    /// `<global>/skills/<name>/SKILL.md`, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidSkillName`] for unsafe names and
    /// [`crate::Error::PathUnwritable`] on permission failure or missing
    /// parent directories.
    pub fn write_skill(
        &self,
        name: &str,
        content: &str,
        create_directories: bool,
    ) -> Result<PathBuf> {
        let global = self.global_path()?;
        let path = write::write_skill_md(&global, name, content, create_directories)?;
        tracing::info!(agent = self.id(), skill = name, ?path, "wrote skill");
        Ok(path)
    }

    /// Reports path existence and writability for this adapter.
    #[must_use]
    pub fn health_check(&self, start_dir: &Path) -> AdapterStatus {
        let global = self.global_path().ok();
        let global_exists = global.as_deref().is_some_and(Path::is_dir);
        let global_writable = global.as_deref().is_some_and(write::probe_writable);

        let project_paths = {
            let mut candidates = Vec::new();
            if let Some(git_root) = platform::find_git_root(start_dir) {
                candidates.push(git_root);
            }
            if !candidates.iter().any(|c| c == start_dir) {
                candidates.push(start_dir.to_path_buf());
            }
            candidates
                .into_iter()
                .map(|dir| dir.join(self.project_dirname()))
                .map(|path| ProjectPathStatus {
                    exists: path.is_dir(),
                    path,
                })
                .collect()
        };

        AdapterStatus {
            agent: self.id().to_string(),
            enabled: self.is_enabled(),
            global_path: global,
            global_path_exists: global_exists,
            global_path_writable: global_writable,
            project_paths,
            shared_path: shared_path(start_dir),
        }
    }
}
