//! Core type definitions for agent path resolution.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The agents this crate knows how to locate.
///
/// This is a closed, compile-time registry: adding support for a new
/// agent means adding a variant here, a module under [`crate::agent`],
/// and an entry in [`AgentKind::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum AgentKind {
    /// Claude Code.
    Claude,
    /// OpenAI Codex CLI.
    Codex,
    /// GitHub Copilot.
    Copilot,
    /// Cursor.
    Cursor,
    /// Gemini CLI.
    Gemini,
    /// OpenCode.
    OpenCode,
    /// Qoder.
    Qoder,
    /// Windsurf.
    Windsurf,
    /// Google Antigravity.
    Antigravity,
}

impl AgentKind {
    /// All supported agent kinds, in fixed registration order.
    pub const ALL: &'static [AgentKind] = &[
        AgentKind::Claude,
        AgentKind::Codex,
        AgentKind::Copilot,
        AgentKind::Cursor,
        AgentKind::Gemini,
        AgentKind::OpenCode,
        AgentKind::Qoder,
        AgentKind::Windsurf,
        AgentKind::Antigravity,
    ];

    /// Stable lowercase identifier, used in configuration and logs.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            AgentKind::Claude => "claude",
            AgentKind::Codex => "codex",
            AgentKind::Copilot => "copilot",
            AgentKind::Cursor => "cursor",
            AgentKind::Gemini => "gemini",
            AgentKind::OpenCode => "opencode",
            AgentKind::Qoder => "qoder",
            AgentKind::Windsurf => "windsurf",
            AgentKind::Antigravity => "antigravity",
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Per-agent configuration, deserialized from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Whether the agent participates in discovery and push.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Override for the agent's global skills root (may start with `~`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_path: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            global_path: None,
        }
    }
}

/// Health report for one agent adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AdapterStatus {
    /// Agent identifier.
    pub agent: String,

    /// Whether the adapter is enabled.
    pub enabled: bool,

    /// Resolved global path, if the home directory could be determined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_path: Option<PathBuf>,

    /// Whether the global path exists on disk.
    pub global_path_exists: bool,

    /// Whether the global path is writable (probed).
    pub global_path_writable: bool,

    /// Project-local paths with their existence.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_paths: Vec<ProjectPathStatus>,

    /// The shared `.agents` path, when present in the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_path: Option<PathBuf>,
}

/// Existence report for a single project-local path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPathStatus {
    /// The project-local config directory.
    pub path: PathBuf,
    /// Whether it exists on disk.
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_kind_all_covers_every_variant() {
        assert_eq!(AgentKind::ALL.len(), 9);
        assert!(AgentKind::ALL.contains(&AgentKind::Claude));
        assert!(AgentKind::ALL.contains(&AgentKind::Antigravity));
    }

    #[test]
    fn agent_kind_ids_are_unique_and_lowercase() {
        let ids: Vec<&str> = AgentKind::ALL.iter().map(|k| k.id()).collect();
        let mut deduped = ids.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
        for id in ids {
            assert_eq!(id, id.to_lowercase());
        }
    }

    #[test]
    fn agent_config_defaults_enabled() {
        let config: AgentConfig = serde_json::from_str("{}").unwrap();
        assert!(config.enabled);
        assert_eq!(config.global_path, None);
    }

    #[test]
    fn agent_config_serde_roundtrip() {
        let config = AgentConfig {
            enabled: false,
            global_path: Some("~/custom/skills".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AgentConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn agent_config_omits_missing_global_path() {
        let config = AgentConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"enabled":true}"#);
    }
}
