//! Locate AI coding agent configuration directories and write skills
//! into them.
//!
//! Each supported agent keeps a global configuration directory under the
//! user's home and a project-local dot-directory at a repository root.
//! This crate resolves both, honors per-agent overrides, and writes
//! `SKILL.md` files into the agent's `skills/` layout atomically.
//!
//! ```no_run
//! use agent_locate::{Agent, AgentKind};
//!
//! let agent = Agent::new(AgentKind::Claude);
//! let global = agent.global_path()?;
//! println!("claude skills live under {}", global.join("skills").display());
//! # Ok::<(), agent_locate::Error>(())
//! ```

pub mod agent;
mod error;
pub mod platform;
mod types;
mod write;

pub use agent::{Agent, SHARED_DIRNAME, shared_path};
pub use error::{Error, Result};
pub use types::{AdapterStatus, AgentConfig, AgentKind, ProjectPathStatus};
pub use write::{is_safe_skill_dirname, probe_writable, write_skill_md};
