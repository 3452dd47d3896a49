//! Configuration: conflict strategy, per-agent settings, sync options.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use agent_locate::{Agent, AgentConfig, AgentKind};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolve::Strategy;
use crate::store;

/// Behavior toggles for sync passes. Everything defaults to on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOptions {
    /// Skip skills whose fingerprint already matches the stored record.
    #[serde(default = "default_true")]
    pub incremental: bool,

    /// Probe destination writability before pushing.
    #[serde(default = "default_true")]
    pub check_permissions: bool,

    /// Create missing skill directories on write.
    #[serde(default = "default_true")]
    pub create_directories: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            incremental: true,
            check_permissions: true,
            create_directories: true,
        }
    }
}

/// Top-level configuration, decoded from the hub's config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// How divergent copies are reconciled.
    #[serde(default)]
    pub conflict_resolution: Strategy,

    /// Per-agent overrides, keyed by agent id. Absent agents use the
    /// defaults (enabled, default paths).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub agents: BTreeMap<String, AgentConfig>,

    /// Sync behavior toggles.
    #[serde(default)]
    pub sync: SyncOptions,

    /// Extra read-only source directories scanned after agent sources.
    /// Entries may start with `~`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remote_sources: Vec<String>,
}

impl Config {
    /// Builds the full adapter list: one [`Agent`] per known kind, with
    /// this configuration's overrides applied.
    #[must_use]
    pub fn adapters(&self) -> Vec<Agent> {
        AgentKind::ALL
            .iter()
            .map(|&kind| {
                let config = self
                    .agents
                    .get(kind.id())
                    .cloned()
                    .unwrap_or_default();
                Agent::with_config(kind, config)
            })
            .collect()
    }

    /// Resolves the extra source directories, expanding `~` prefixes.
    /// Unresolvable entries are logged and dropped.
    #[must_use]
    pub fn remote_dirs(&self) -> Vec<PathBuf> {
        self.remote_sources
            .iter()
            .filter_map(|raw| match agent_locate::platform::expand_home(raw) {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(source = %raw, %e, "dropping unresolvable extra source");
                    None
                }
            })
            .collect()
    }
}

/// Loads and saves the configuration file.
///
/// Loading never fails: a missing file yields the defaults silently, an
/// unreadable or undecodable file yields the defaults with an error log
/// so one bad edit cannot brick syncing.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// The configuration file location under a hub root.
    #[must_use]
    pub fn default_path(hub_root: &Path) -> PathBuf {
        hub_root.join(store::METADATA_DIRNAME).join("config.json")
    }

    /// Creates a store for the given file path.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, falling back to defaults.
    #[must_use]
    pub fn load(&self) -> Config {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Config::default(),
            Err(e) => {
                tracing::error!(path = %self.path.display(), %e, "could not read config, using defaults");
                return Config::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(path = %self.path.display(), %e, "invalid config, using defaults");
                Config::default()
            }
        }
    }

    /// Saves the configuration atomically as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or
    /// the file cannot be written.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(config)?;
        store::write_atomic(&self.path, &json)?;
        Ok(())
    }
}
