//! Pull, push, and full sync between discovered sources and the hub.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use agent_locate::{Agent, AdapterStatus};

use crate::config::{Config, ConfigStore};
use crate::discover;
use crate::error::{Error, Result};
use crate::parse;
use crate::registry::Registry;
use crate::resolve::{self, Resolution, ResolveContext};
use crate::store::{self, MetadataStore};
use crate::types::{
    Skill, SkillSource, SyncFailure, SyncRecord, SyncSummary, now_ms,
};

/// A skill as stored in the hub, read back for pushing.
struct HubSkill {
    name: String,
    raw: String,
    fingerprint: String,
}

/// Orchestrates discovery, conflict resolution, and copying between
/// agent directories and the central hub.
///
/// The hub layout is flat: `<hub>/<name>/SKILL.md`, with metadata under
/// `<hub>/.skill-sync/`. A sync pass holds an advisory file lock so two
/// processes serialize instead of interleaving writes.
#[derive(Debug)]
pub struct SyncEngine {
    config: Config,
    hub_root: PathBuf,
    start_dir: PathBuf,
    store: MetadataStore,
    adapters: Vec<Agent>,
    manual_choices: HashMap<String, String>,
}

/// The default hub location: `~/.agents/skills`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_hub_root() -> Result<PathBuf> {
    Ok(agent_locate::platform::home_dir()?.join(".agents").join("skills"))
}

impl SyncEngine {
    /// Opens the engine against the default hub, loading configuration
    /// from the hub's config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or
    /// the hub's metadata directory cannot be created.
    pub fn new(start_dir: &Path) -> Result<Self> {
        Self::with_hub_root(default_hub_root()?, start_dir)
    }

    /// Opens the engine against an explicit hub root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the hub's metadata
    /// directory cannot be created.
    pub fn with_hub_root(hub_root: PathBuf, start_dir: &Path) -> Result<Self> {
        let config = ConfigStore::new(ConfigStore::default_path(&hub_root)).load();
        Self::with_config(config, hub_root, start_dir)
    }

    /// Opens the engine with an explicit configuration, bypassing the
    /// config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the hub's metadata
    /// directory cannot be created.
    pub fn with_config(config: Config, hub_root: PathBuf, start_dir: &Path) -> Result<Self> {
        let store = MetadataStore::open(&hub_root)?;
        let adapters = config.adapters();
        Ok(Self {
            config,
            hub_root,
            start_dir: start_dir.to_path_buf(),
            store,
            adapters,
            manual_choices: HashMap::new(),
        })
    }

    /// The hub root this engine operates on.
    #[must_use]
    pub fn hub_root(&self) -> &Path {
        &self.hub_root
    }

    /// Records a decision for a manually resolved conflict: the copy
    /// with this fingerprint wins on the next pass.
    ///
    /// Decisions accumulate in memory; a pass that finds no copy with
    /// the given fingerprint leaves the skill unresolved again.
    pub fn resolve_manual(&mut self, name: &str, fingerprint: &str) {
        self.manual_choices
            .insert(name.to_string(), fingerprint.to_string());
    }

    /// One discovery pass over every external source, hub excluded.
    #[must_use]
    pub fn discover(&self) -> Vec<(Skill, SkillSource)> {
        discover::discover(
            &self.adapters,
            &self.start_dir,
            &self.config.remote_dirs(),
            Some(&self.hub_root),
        )
    }

    /// Pulls discovered skills into the hub.
    ///
    /// # Errors
    ///
    /// Returns an error only if the hub lock cannot be acquired.
    /// Per-skill failures are folded into the summary.
    pub fn pull(&self) -> Result<SyncSummary> {
        let mut lock = self.lock_file()?;
        let _guard = self.acquire(&mut lock)?;
        Ok(self.pull_inner())
    }

    /// Pushes hub skills out to every enabled agent's global directory.
    ///
    /// # Errors
    ///
    /// Returns an error only if the hub lock cannot be acquired.
    pub fn push(&self) -> Result<SyncSummary> {
        let mut lock = self.lock_file()?;
        let _guard = self.acquire(&mut lock)?;
        Ok(self.push_inner())
    }

    /// Full pass: pull into the hub, then push the updated hub out,
    /// under one lock.
    ///
    /// # Errors
    ///
    /// Returns an error only if the hub lock cannot be acquired.
    pub fn sync(&self) -> Result<SyncSummary> {
        let mut lock = self.lock_file()?;
        let _guard = self.acquire(&mut lock)?;
        let mut summary = self.pull_inner();
        summary.merge(self.push_inner());
        Ok(summary)
    }

    /// Reports path health for every adapter, enabled or not.
    #[must_use]
    pub fn health_check(&self) -> Vec<AdapterStatus> {
        self.adapters
            .iter()
            .map(|a| a.health_check(&self.start_dir))
            .collect()
    }

    fn lock_file(&self) -> Result<fd_lock::RwLock<fs::File>> {
        let path = self.store.lock_path();
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| Error::LockFailed {
                path: path.clone(),
                source,
            })?;
        Ok(fd_lock::RwLock::new(file))
    }

    fn acquire<'a>(
        &self,
        lock: &'a mut fd_lock::RwLock<fs::File>,
    ) -> Result<fd_lock::RwLockWriteGuard<'a, fs::File>> {
        lock.write().map_err(|source| Error::LockFailed {
            path: self.store.lock_path(),
            source,
        })
    }

    fn pull_inner(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let strategy = self.config.conflict_resolution;
        let incremental = self.config.sync.incremental;

        let mut registry = Registry::from_discovered(self.discover());
        tracing::info!(
            skills = registry.len(),
            conflicts = registry.conflicted_names().len(),
            "pull pass starting"
        );

        for i in 0..registry.len() {
            let decided = {
                let entry = registry.entry_at(i);
                if entry.is_conflicted() {
                    let hub_fp = self.hub_fingerprint(&entry.name);
                    let ctx = ResolveContext {
                        hub_fingerprint: hub_fp.as_deref(),
                        manual_choice: self
                            .manual_choices
                            .get(&entry.name)
                            .map(String::as_str),
                    };
                    let resolution = resolve::resolve(entry, strategy, ctx);
                    resolve::log_resolution(entry, strategy, resolution);

                    let chosen_fp = match resolution {
                        Resolution::Chosen { index } => {
                            Some(entry.observed[index].0.fingerprint.clone())
                        }
                        Resolution::KeepHub => hub_fp.clone(),
                        Resolution::Unresolved => None,
                    };
                    summary
                        .conflicts
                        .push(entry.conflict_report(strategy.as_str(), chosen_fp));

                    match resolution {
                        Resolution::Chosen { index } => Some(index),
                        Resolution::KeepHub => {
                            summary.skipped += 1;
                            None
                        }
                        Resolution::Unresolved => None,
                    }
                } else {
                    Some(0)
                }
            };

            let Some(index) = decided else { continue };
            let (skill, sources) = {
                let entry = registry.entry_at(i);
                let skill = entry.observed[index].0.clone();
                let sources: Vec<SkillSource> =
                    entry.observed.iter().map(|(_, s)| s.clone()).collect();
                (skill, sources)
            };

            // A record alone is not enough to skip: the hub copy may
            // have been deleted out-of-band since it was written.
            let hub_file = self.hub_root.join(&skill.name).join("SKILL.md");
            if hub_file.is_file()
                && self
                    .store
                    .should_skip(&skill.name, &skill.fingerprint, incremental)
            {
                // Content unchanged, but the set of places it lives in
                // may have moved.
                if let Some(mut record) = self.store.get(&skill.name) {
                    record.sources_seen = sources;
                    if let Err(e) = self.store.put(record) {
                        tracing::warn!(skill = %skill.name, %e, "could not refresh sync record");
                    }
                }
                summary.skipped += 1;
                continue;
            }

            match self.copy_to_hub(&skill) {
                Ok(path) => {
                    tracing::info!(skill = %skill.name, path = %path.display(), "pulled into hub");
                    let previous = self.store.get(&skill.name);
                    let record = SyncRecord {
                        name: skill.name.clone(),
                        last_fingerprint: skill.fingerprint.clone(),
                        last_synced_at_ms: now_ms(),
                        sources_seen: sources,
                        pushed: previous.map(|r| r.pushed).unwrap_or_default(),
                        last_error: None,
                    };
                    if let Err(e) = self.store.put(record) {
                        tracing::warn!(skill = %skill.name, %e, "could not persist sync record");
                    }
                    summary.copied += 1;
                    registry.set_resolved_at(i, skill);
                }
                Err(e) => {
                    self.store.record_error(&skill.name, &e.to_string());
                    summary.errors.push(SyncFailure {
                        name: skill.name.clone(),
                        agent: None,
                        message: e.to_string(),
                    });
                }
            }
        }

        let observed: Vec<String> = registry.entries().map(|e| e.name.clone()).collect();
        let orphans = self.store.orphans(&observed);
        if !orphans.is_empty() {
            tracing::warn!(?orphans, "sync records for skills no longer observed");
        }

        summary
    }

    fn push_inner(&self) -> SyncSummary {
        let mut summary = SyncSummary::default();
        let incremental = self.config.sync.incremental;
        let create_directories = self.config.sync.create_directories;

        for skill in self.hub_skills() {
            let mut pushed_now: Vec<String> = Vec::new();
            for agent in self.adapters.iter().filter(|a| a.is_enabled()) {
                if self
                    .store
                    .should_skip_push(&skill.name, agent.id(), &skill.fingerprint, incremental)
                {
                    summary.skipped += 1;
                    continue;
                }

                if self.config.sync.check_permissions {
                    if let Ok(global) = agent.global_path() {
                        if global.is_dir() && !agent_locate::probe_writable(&global) {
                            let message = format!(
                                "destination not writable: {}",
                                global.display()
                            );
                            self.store.record_error(&skill.name, &message);
                            summary.errors.push(SyncFailure {
                                name: skill.name.clone(),
                                agent: Some(agent.id().to_string()),
                                message,
                            });
                            continue;
                        }
                    }
                }

                match agent.write_skill(&skill.name, &skill.raw, create_directories) {
                    Ok(_) => {
                        summary.copied += 1;
                        pushed_now.push(agent.id().to_string());
                    }
                    Err(e) => {
                        self.store.record_error(&skill.name, &e.to_string());
                        summary.errors.push(SyncFailure {
                            name: skill.name.clone(),
                            agent: Some(agent.id().to_string()),
                            message: e.to_string(),
                        });
                    }
                }
            }

            if !pushed_now.is_empty() {
                let mut record = self.store.get(&skill.name).unwrap_or_else(|| SyncRecord {
                    name: skill.name.clone(),
                    last_fingerprint: skill.fingerprint.clone(),
                    last_synced_at_ms: now_ms(),
                    sources_seen: Vec::new(),
                    pushed: Default::default(),
                    last_error: None,
                });
                for agent_id in pushed_now {
                    record.pushed.insert(agent_id, skill.fingerprint.clone());
                }
                if let Err(e) = self.store.put(record) {
                    tracing::warn!(skill = %skill.name, %e, "could not persist push record");
                }
            }
        }

        summary
    }

    /// Writes a skill into the hub layout atomically.
    fn copy_to_hub(&self, skill: &Skill) -> Result<PathBuf> {
        let dir = self.hub_root.join(&skill.name);
        fs::create_dir_all(&dir)?;
        let path = dir.join("SKILL.md");
        store::write_atomic(&path, skill.raw.as_bytes())?;
        Ok(path)
    }

    /// Fingerprint of the hub's current copy of a skill, if one exists.
    fn hub_fingerprint(&self, name: &str) -> Option<String> {
        let path = self.hub_root.join(name).join("SKILL.md");
        fs::read(&path).ok().map(|bytes| parse::fingerprint(&bytes))
    }

    /// Skills currently in the hub, in name order.
    fn hub_skills(&self) -> Vec<HubSkill> {
        let entries = match fs::read_dir(&self.hub_root) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_dir()
                    && path.file_name().and_then(|n| n.to_str())
                        != Some(store::METADATA_DIRNAME)
            })
            .collect();
        dirs.sort();

        let mut skills = Vec::new();
        for dir in dirs {
            let Some(name) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let file = dir.join("SKILL.md");
            let raw = match fs::read_to_string(&file) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %file.display(), %e, "skipping unreadable hub skill");
                    continue;
                }
            };
            skills.push(HubSkill {
                name: name.to_string(),
                fingerprint: parse::fingerprint(raw.as_bytes()),
                raw,
            });
        }
        skills
    }
}
