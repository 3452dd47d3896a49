//! Discovery, registry, and synchronization of `SKILL.md` skills
//! across AI coding agent configuration directories.
//!
//! Skills are markdown files with YAML front matter, living in a
//! `skills/<name>/SKILL.md` layout inside agent configuration
//! directories. This crate finds every copy visible from a working
//! directory, reconciles divergent copies with a configurable strategy,
//! and keeps a central hub (`~/.agents/skills` by default) and the
//! agents' own directories in step.
//!
//! ```no_run
//! use skill_sync::SyncEngine;
//!
//! let engine = SyncEngine::new(std::path::Path::new("."))?;
//! let summary = engine.sync()?;
//! println!("copied {}, skipped {}", summary.copied, summary.skipped);
//! # Ok::<(), skill_sync::Error>(())
//! ```

mod config;
mod discover;
mod error;
mod parse;
mod registry;
mod resolve;
mod store;
mod sync;
mod types;

pub use config::{Config, ConfigStore, SyncOptions};
pub use discover::discover;
pub use error::{Error, ParseError, Result};
pub use parse::{fingerprint, parse_file, parse_str};
pub use registry::{Registry, RegistryEntry};
pub use resolve::{Resolution, ResolveContext, Strategy, resolve};
pub use store::{METADATA_DIRNAME, MetadataStore};
pub use sync::{SyncEngine, default_hub_root};
pub use types::{
    ConflictCandidate, ConflictReport, Skill, SkillSource, SourceOrigin, SyncFailure,
    SyncRecord, SyncSummary, now_ms,
};
