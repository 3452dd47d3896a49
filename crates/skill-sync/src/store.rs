//! Persistent per-skill sync metadata under the hub.
//!
//! Each skill gets one JSON record at `<hub>/.skill-sync/<name>.json`.
//! Records are advisory state for incremental syncs; losing them only
//! costs a full re-copy, never data.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::SyncRecord;

/// Directory under the hub root holding metadata and the lock file.
pub const METADATA_DIRNAME: &str = ".skill-sync";

/// How many observed sources a record retains per pass.
const SOURCES_CAP: usize = 10;

/// Store of per-skill sync records.
#[derive(Debug)]
pub struct MetadataStore {
    dir: PathBuf,
}

impl MetadataStore {
    /// Opens (creating if needed) the metadata directory under
    /// `hub_root`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreUnavailable`] if the directory cannot be
    /// created.
    pub fn open(hub_root: &Path) -> Result<Self> {
        let dir = hub_root.join(METADATA_DIRNAME);
        fs::create_dir_all(&dir).map_err(|source| Error::StoreUnavailable {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Path of the advisory lock file guarding sync passes.
    #[must_use]
    pub fn lock_path(&self) -> PathBuf {
        self.dir.join("lock")
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Loads the record for a skill.
    ///
    /// A missing record returns `None`. A corrupt record is logged and
    /// treated as absent, so it will be rewritten on the next sync.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<SyncRecord> {
        let path = self.record_path(name);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "could not read sync record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(path = %path.display(), %e, "corrupt sync record, treating as absent");
                None
            }
        }
    }

    /// Writes a record atomically, capping its source list.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn put(&self, mut record: SyncRecord) -> Result<()> {
        record.sources_seen.truncate(SOURCES_CAP);
        let path = self.record_path(&record.name);
        let json = serde_json::to_vec_pretty(&record)?;
        write_atomic(&path, &json)?;
        Ok(())
    }

    /// Returns `true` when an incremental pull can skip this skill.
    #[must_use]
    pub fn should_skip(&self, name: &str, fingerprint: &str, incremental: bool) -> bool {
        incremental
            && self
                .get(name)
                .is_some_and(|r| r.last_fingerprint == fingerprint)
    }

    /// Returns `true` when an incremental push can skip this
    /// skill/agent pair.
    #[must_use]
    pub fn should_skip_push(
        &self,
        name: &str,
        agent_id: &str,
        fingerprint: &str,
        incremental: bool,
    ) -> bool {
        incremental
            && self
                .get(name)
                .is_some_and(|r| r.pushed.get(agent_id).is_some_and(|fp| fp == fingerprint))
    }

    /// Records a per-skill failure without disturbing the rest of the
    /// record.
    pub fn record_error(&self, name: &str, message: &str) {
        let mut record = self.get(name).unwrap_or_else(|| SyncRecord {
            name: name.to_string(),
            last_fingerprint: String::new(),
            last_synced_at_ms: 0,
            sources_seen: Vec::new(),
            pushed: Default::default(),
            last_error: None,
        });
        record.last_error = Some(message.to_string());
        if let Err(e) = self.put(record) {
            tracing::warn!(skill = name, %e, "could not persist sync error");
        }
    }

    /// Names with a metadata record that were not among the given
    /// observed names.
    ///
    /// Orphans are reported so a caller can surface them; they are never
    /// deleted here.
    #[must_use]
    pub fn orphans(&self, observed: &[String]) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };
        let mut orphans: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_str()?.strip_suffix(".json")?.to_string();
                (!observed.contains(&name)).then_some(name)
            })
            .collect();
        orphans.sort();
        orphans
    }
}

/// Writes a file via a temp sibling and rename, so readers never see a
/// partial file.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
