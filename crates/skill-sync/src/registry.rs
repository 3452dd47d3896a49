//! In-memory registry of discovered skills, grouped by name.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{ConflictCandidate, ConflictReport, Skill, SkillSource};

/// All skills observed during one discovery pass, keyed by name.
///
/// Entries keep every observed copy in discovery order, so the first
/// source of an entry is always the highest-priority one.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
    index: HashMap<String, usize>,
}

/// One skill name with every copy discovery observed for it.
#[derive(Debug)]
pub struct RegistryEntry {
    /// The skill name.
    pub name: String,

    /// Every observed (skill, source) pair, in discovery order.
    pub observed: Vec<(Skill, SkillSource)>,

    /// The copy chosen by conflict resolution, when one has been.
    pub resolved: Option<Skill>,
}

impl RegistryEntry {
    /// Distinct fingerprints among observed copies, in first-seen order.
    #[must_use]
    pub fn distinct_fingerprints(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for (skill, _) in &self.observed {
            if !seen.contains(&skill.fingerprint.as_str()) {
                seen.push(skill.fingerprint.as_str());
            }
        }
        seen
    }

    /// Returns `true` when observed copies diverge in content.
    ///
    /// Identical copies in several places are duplicates, not a
    /// conflict.
    #[must_use]
    pub fn is_conflicted(&self) -> bool {
        self.distinct_fingerprints().len() > 1
    }

    /// Builds a conflict report listing one candidate per distinct
    /// fingerprint.
    #[must_use]
    pub fn conflict_report(&self, strategy: &str, chosen: Option<String>) -> ConflictReport {
        let mut candidates: Vec<ConflictCandidate> = Vec::new();
        for (skill, source) in &self.observed {
            if candidates.iter().any(|c| c.fingerprint == skill.fingerprint) {
                continue;
            }
            candidates.push(ConflictCandidate {
                path: source.path.clone(),
                origin: source.origin.clone(),
                fingerprint: skill.fingerprint.clone(),
            });
        }
        ConflictReport {
            name: self.name.clone(),
            strategy: strategy.to_string(),
            candidates,
            chosen,
        }
    }
}

impl Registry {
    /// Builds a registry from discovery output, preserving order.
    #[must_use]
    pub fn from_discovered(found: Vec<(Skill, SkillSource)>) -> Self {
        let mut registry = Self::default();
        for (skill, source) in found {
            registry.ingest(skill, source);
        }
        registry
    }

    /// Adds one observed copy. The first observation of a name creates
    /// its entry; later ones append to it.
    pub fn ingest(&mut self, skill: Skill, source: SkillSource) {
        match self.index.get(&skill.name) {
            Some(&i) => self.entries[i].observed.push((skill, source)),
            None => {
                self.index.insert(skill.name.clone(), self.entries.len());
                self.entries.push(RegistryEntry {
                    name: skill.name.clone(),
                    observed: vec![(skill, source)],
                    resolved: None,
                });
            }
        }
    }

    /// Number of distinct skill names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up an entry by skill name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Entries in discovery order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Entry access by position, for two-phase passes that decide first
    /// and mutate after.
    #[must_use]
    pub fn entry_at(&self, index: usize) -> &RegistryEntry {
        &self.entries[index]
    }

    /// Records the resolved copy for the entry at `index`.
    pub fn set_resolved_at(&mut self, index: usize, skill: Skill) {
        self.entries[index].resolved = Some(skill);
    }

    /// Names with divergent copies, in first-seen order.
    #[must_use]
    pub fn conflicted_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.is_conflicted())
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Serializes the registry for inspection or export.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON encoding fails.
    pub fn export_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct ExportEntry<'a> {
            name: &'a str,
            description: &'a str,
            conflicted: bool,
            sources: Vec<&'a SkillSource>,
        }

        let export: Vec<ExportEntry<'_>> = self
            .entries
            .iter()
            .map(|e| ExportEntry {
                name: &e.name,
                description: &e.observed[0].0.description,
                conflicted: e.is_conflicted(),
                sources: e.observed.iter().map(|(_, s)| s).collect(),
            })
            .collect();
        serde_json::to_string_pretty(&export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::types::SourceOrigin;
    use std::path::PathBuf;

    fn skill(name: &str, body: &str) -> Skill {
        parse::parse_str(&format!(
            "---\nname: {name}\ndescription: a test skill\n---\n{body}\n"
        ))
        .unwrap()
    }

    fn source(path: &str, origin: SourceOrigin) -> SkillSource {
        SkillSource {
            path: PathBuf::from(path),
            origin,
            discovered_at_ms: 0,
            mtime: None,
        }
    }

    #[test]
    fn duplicates_are_not_conflicts() {
        let registry = Registry::from_discovered(vec![
            (skill("alpha", "same"), source("/a", SourceOrigin::Shared)),
            (
                skill("alpha", "same"),
                source("/b", SourceOrigin::Agent("cursor".into())),
            ),
        ]);

        let entry = registry.get("alpha").unwrap();
        assert_eq!(entry.observed.len(), 2);
        assert!(!entry.is_conflicted());
        assert!(registry.conflicted_names().is_empty());
    }

    #[test]
    fn divergent_copies_conflict() {
        let registry = Registry::from_discovered(vec![
            (skill("alpha", "one"), source("/a", SourceOrigin::Shared)),
            (
                skill("alpha", "two"),
                source("/b", SourceOrigin::Agent("cursor".into())),
            ),
        ]);

        assert_eq!(registry.conflicted_names(), vec!["alpha"]);
        let report = registry
            .get("alpha")
            .unwrap()
            .conflict_report("newest", None);
        assert_eq!(report.candidates.len(), 2);
    }

    #[test]
    fn conflict_report_collapses_identical_candidates() {
        let registry = Registry::from_discovered(vec![
            (skill("alpha", "one"), source("/a", SourceOrigin::Shared)),
            (
                skill("alpha", "one"),
                source("/b", SourceOrigin::Agent("claude".into())),
            ),
            (
                skill("alpha", "two"),
                source("/c", SourceOrigin::Agent("cursor".into())),
            ),
        ]);

        let entry = registry.get("alpha").unwrap();
        assert!(entry.is_conflicted());
        let report = entry.conflict_report("newest", None);
        // One candidate per distinct fingerprint.
        assert_eq!(report.candidates.len(), 2);
        assert_eq!(report.candidates[0].path, PathBuf::from("/a"));
    }

    #[test]
    fn entries_keep_discovery_order() {
        let registry = Registry::from_discovered(vec![
            (skill("zeta", "z"), source("/z", SourceOrigin::Shared)),
            (skill("alpha", "a"), source("/a", SourceOrigin::Shared)),
        ]);

        let names: Vec<&str> = registry.entries().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn export_json_lists_every_entry() {
        let registry = Registry::from_discovered(vec![(
            skill("alpha", "a"),
            source("/a", SourceOrigin::Shared),
        )]);
        let json = registry.export_json().unwrap();
        assert!(json.contains(r#""name": "alpha""#));
        assert!(json.contains(r#""conflicted": false"#));
    }
}
