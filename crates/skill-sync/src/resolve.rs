//! Conflict resolution strategies for divergent skill copies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::registry::RegistryEntry;

/// How divergent copies of one skill are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// The most recently modified copy wins. On an mtime tie the
    /// highest-priority source wins.
    #[default]
    Newest,

    /// Every conflict is surfaced for an explicit decision.
    Manual,

    /// The copy already in the hub wins; skills with no hub copy stay
    /// unresolved.
    HubPriority,

    /// Extra-source copies win over local ones; falls back to newest
    /// when no extra-source copy exists.
    RemotePriority,

    /// Local copies win over extra-source ones; falls back to newest
    /// when only extra-source copies exist.
    LocalPriority,
}

impl Strategy {
    /// Stable kebab-case identifier, matching the configuration value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Newest => "newest",
            Strategy::Manual => "manual",
            Strategy::HubPriority => "hub-priority",
            Strategy::RemotePriority => "remote-priority",
            Strategy::LocalPriority => "local-priority",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one conflicted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The observed copy at this index wins.
    Chosen {
        /// Index into the entry's observed list.
        index: usize,
    },

    /// The hub's existing copy stays as is.
    KeepHub,

    /// No decision could be made; the skill is held back.
    Unresolved,
}

/// Inputs a strategy may need beyond the entry itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveContext<'a> {
    /// Fingerprint of the copy currently in the hub, if any.
    pub hub_fingerprint: Option<&'a str>,

    /// Fingerprint explicitly chosen for this skill, if any.
    pub manual_choice: Option<&'a str>,
}

/// Applies `strategy` to a conflicted entry.
#[must_use]
pub fn resolve(entry: &RegistryEntry, strategy: Strategy, ctx: ResolveContext<'_>) -> Resolution {
    match strategy {
        Strategy::Newest => Resolution::Chosen {
            index: newest_index(entry, None),
        },
        Strategy::LocalPriority => Resolution::Chosen {
            index: newest_index(entry, Some(true)),
        },
        Strategy::RemotePriority => Resolution::Chosen {
            index: newest_index(entry, Some(false)),
        },
        Strategy::HubPriority => match ctx.hub_fingerprint {
            Some(_) => Resolution::KeepHub,
            None => Resolution::Unresolved,
        },
        Strategy::Manual => match ctx.manual_choice {
            Some(fp) => match entry
                .observed
                .iter()
                .position(|(skill, _)| skill.fingerprint == fp)
            {
                Some(index) => Resolution::Chosen { index },
                None => {
                    tracing::warn!(
                        skill = %entry.name,
                        fingerprint = fp,
                        "manual choice matches no observed copy"
                    );
                    Resolution::Unresolved
                }
            },
            None => Resolution::Unresolved,
        },
    }
}

/// Index of the newest observed copy, optionally restricted to local
/// (`Some(true)`) or extra-source (`Some(false)`) origins.
///
/// A strictly greater mtime is required to displace the running winner,
/// so ties resolve to the earliest (highest-priority) source. When the
/// preferred origin class has no copies, all copies compete.
fn newest_index(entry: &RegistryEntry, prefer_local: Option<bool>) -> usize {
    let matches_class = |i: usize| -> bool {
        match prefer_local {
            None => true,
            Some(local) => entry.observed[i].1.origin.is_local() == local,
        }
    };
    let any_in_class = (0..entry.observed.len()).any(&matches_class);

    let mut best = None;
    for (i, (_, source)) in entry.observed.iter().enumerate() {
        if any_in_class && !matches_class(i) {
            continue;
        }
        match best {
            None => best = Some((i, source.mtime)),
            Some((_, best_mtime)) => {
                if source.mtime > best_mtime {
                    best = Some((i, source.mtime));
                }
            }
        }
    }
    best.map_or(0, |(i, _)| i)
}

/// Logs the outcome of a resolution, naming the winning path and the
/// paths that lost.
pub fn log_resolution(entry: &RegistryEntry, strategy: Strategy, resolution: Resolution) {
    match resolution {
        Resolution::Chosen { index } => {
            let winner = &entry.observed[index].1;
            tracing::info!(
                skill = %entry.name,
                strategy = %strategy,
                winner = %winner.path.display(),
                "conflict resolved"
            );
            for (i, (_, source)) in entry.observed.iter().enumerate() {
                if i != index {
                    tracing::debug!(
                        skill = %entry.name,
                        rejected = %source.path.display(),
                        "conflict loser"
                    );
                }
            }
        }
        Resolution::KeepHub => {
            tracing::info!(skill = %entry.name, strategy = %strategy, "keeping hub copy");
        }
        Resolution::Unresolved => {
            tracing::warn!(
                skill = %entry.name,
                strategy = %strategy,
                copies = entry.observed.len(),
                "conflict unresolved, skill held back"
            );
        }
    }
}
