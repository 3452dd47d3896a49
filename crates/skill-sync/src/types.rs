//! Core data types shared across discovery, resolution, and sync.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// A parsed skill: validated front matter plus its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Canonical skill name from the front matter.
    pub name: String,

    /// Human-readable description (1..=1024 characters).
    pub description: String,

    /// Optional license identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Optional free-form compatibility note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility: Option<String>,

    /// Free-form metadata carried through verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_yaml::Value>,

    /// Markdown body after the front matter fence.
    pub body: String,

    /// The exact raw file content the skill was parsed from.
    #[serde(skip)]
    pub raw: String,

    /// SHA-256 hex digest of the raw file bytes.
    pub fingerprint: String,
}

/// Where a skill file came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceOrigin {
    /// The agent-agnostic shared `.agents` directory at a project root.
    Shared,
    /// A specific agent's directory, identified by agent id.
    Agent(String),
    /// An extra configured source directory.
    Remote,
}

impl SourceOrigin {
    /// Stable string form used in metadata records and logs.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            SourceOrigin::Shared => "shared",
            SourceOrigin::Agent(id) => id,
            SourceOrigin::Remote => "remote",
        }
    }

    /// Returns `true` for project-local and agent-global origins.
    #[must_use]
    pub fn is_local(&self) -> bool {
        !matches!(self, SourceOrigin::Remote)
    }
}

impl From<String> for SourceOrigin {
    fn from(s: String) -> Self {
        match s.as_str() {
            "shared" => SourceOrigin::Shared,
            "remote" => SourceOrigin::Remote,
            _ => SourceOrigin::Agent(s),
        }
    }
}

impl From<SourceOrigin> for String {
    fn from(origin: SourceOrigin) -> Self {
        origin.as_str().to_string()
    }
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed location of a skill file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSource {
    /// Absolute path of the `SKILL.md` file.
    pub path: PathBuf,

    /// Which kind of location it was found in.
    pub origin: SourceOrigin,

    /// When discovery observed this source (epoch milliseconds).
    pub discovered_at_ms: u64,

    /// File modification time, when the filesystem reports one.
    #[serde(skip)]
    pub mtime: Option<SystemTime>,
}

/// Per-skill synchronization record persisted in the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Skill name, matching the file name of the record.
    pub name: String,

    /// Fingerprint of the content last written into the hub.
    pub last_fingerprint: String,

    /// When the hub copy was last updated (epoch milliseconds).
    pub last_synced_at_ms: u64,

    /// Sources observed during the most recent pass, replaced wholesale
    /// each time.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources_seen: Vec<SkillSource>,

    /// Fingerprint last pushed to each agent, keyed by agent id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pushed: BTreeMap<String, String>,

    /// Most recent per-skill failure, cleared on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Outcome of a pull, push, or full sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    /// Files actually written.
    pub copied: usize,

    /// Skills skipped as already up to date.
    pub skipped: usize,

    /// Conflicts encountered, resolved or not.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<ConflictReport>,

    /// Per-skill failures that did not abort the pass.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<SyncFailure>,
}

impl SyncSummary {
    /// Folds another summary into this one.
    pub fn merge(&mut self, other: SyncSummary) {
        self.copied += other.copied;
        self.skipped += other.skipped;
        self.conflicts.extend(other.conflicts);
        self.errors.extend(other.errors);
    }
}

/// A single skill-level failure inside a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncFailure {
    /// The skill that failed.
    pub name: String,

    /// The agent involved, when the failure was agent-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Human-readable failure description.
    pub message: String,
}

/// A conflict between divergent copies of one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// The conflicted skill.
    pub name: String,

    /// The strategy that was applied.
    pub strategy: String,

    /// Every divergent candidate, in discovery order.
    pub candidates: Vec<ConflictCandidate>,

    /// Fingerprint of the winning candidate, `None` when unresolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<String>,
}

/// One candidate copy inside a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCandidate {
    /// Where the copy lives.
    pub path: PathBuf,

    /// Which origin produced it.
    pub origin: SourceOrigin,

    /// Fingerprint of this copy.
    pub fingerprint: String,
}

/// Current time as epoch milliseconds.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
