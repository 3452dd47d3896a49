//! Skill discovery across shared, agent, and remote directories.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use agent_locate::Agent;

use crate::parse;
use crate::types::{Skill, SkillSource, SourceOrigin, now_ms};

/// Discovers every parseable skill visible from `start_dir`, in
/// priority order.
///
/// Search order is deterministic: the shared `.agents/skills` directory
/// at the git root first, then each enabled agent in turn (its
/// project-local directories, then its global directory), then any
/// configured extra source directories. Within one directory, skill
/// subdirectories are visited in name order.
///
/// Unreadable directories and invalid skill files are skipped with a
/// warning. `exclude` removes the hub's own directory from the scan so
/// the hub never discovers itself.
#[must_use]
pub fn discover(
    agents: &[Agent],
    start_dir: &Path,
    remote_dirs: &[PathBuf],
    exclude: Option<&Path>,
) -> Vec<(Skill, SkillSource)> {
    let mut found = Vec::new();
    let mut seen_dirs = HashSet::new();

    if let Some(shared) = agent_locate::shared_path(start_dir) {
        scan_skills_dir(
            &shared.join("skills"),
            SourceOrigin::Shared,
            exclude,
            &mut seen_dirs,
            &mut found,
        );
    }

    for agent in agents.iter().filter(|a| a.is_enabled()) {
        let origin = SourceOrigin::Agent(agent.id().to_string());
        for root in agent.search_paths(start_dir, false) {
            scan_skills_dir(
                &root.join("skills"),
                origin.clone(),
                exclude,
                &mut seen_dirs,
                &mut found,
            );
        }
    }

    for remote in remote_dirs {
        scan_skills_dir(remote, SourceOrigin::Remote, exclude, &mut seen_dirs, &mut found);
    }

    found
}

/// Scans one skills directory: every immediate subdirectory holding a
/// `SKILL.md`, one level deep.
fn scan_skills_dir(
    skills_dir: &Path,
    origin: SourceOrigin,
    exclude: Option<&Path>,
    seen_dirs: &mut HashSet<PathBuf>,
    found: &mut Vec<(Skill, SkillSource)>,
) {
    if !skills_dir.is_dir() {
        return;
    }
    if exclude.is_some_and(|hub| same_path(skills_dir, hub)) {
        return;
    }
    // Two agents may point at the same override directory.
    let key = skills_dir
        .canonicalize()
        .unwrap_or_else(|_| skills_dir.to_path_buf());
    if !seen_dirs.insert(key) {
        return;
    }

    let entries = match fs::read_dir(skills_dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %skills_dir.display(), %e, "skipping unreadable skills directory");
            return;
        }
    };

    let mut subdirs: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    subdirs.sort();

    for subdir in subdirs {
        let file = subdir.join("SKILL.md");
        if !file.is_file() {
            continue;
        }

        let skill = match parse::parse_file(&file) {
            Ok(skill) => skill,
            Err(e) => {
                tracing::warn!(path = %file.display(), %e, "skipping invalid skill file");
                continue;
            }
        };

        if subdir.file_name().and_then(|n| n.to_str()) != Some(skill.name.as_str()) {
            tracing::warn!(
                path = %file.display(),
                skill = %skill.name,
                "directory name does not match skill name"
            );
        }

        let mtime = fs::metadata(&file).and_then(|m| m.modified()).ok();
        found.push((
            skill,
            SkillSource {
                path: file,
                origin: origin.clone(),
                discovered_at_ms: now_ms(),
                mtime,
            },
        ));
    }
}

/// Compares two directories for identity, resolving symlinks when
/// possible.
fn same_path(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_locate::{AgentConfig, AgentKind};

    fn write_skill(root: &Path, name: &str, description: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("SKILL.md"),
            format!("---\nname: {name}\ndescription: {description}\n---\nbody\n"),
        )
        .unwrap();
    }

    fn agent_with_global(kind: AgentKind, global: &Path) -> Agent {
        Agent::with_config(
            kind,
            AgentConfig {
                enabled: true,
                global_path: Some(global.to_string_lossy().into_owned()),
            },
        )
    }

    #[test]
    fn shared_comes_before_agent_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        fs::create_dir_all(project.join(".git")).unwrap();
        write_skill(&project.join(".agents/skills"), "alpha", "shared copy");

        let global = tmp.path().join("cursor-global");
        write_skill(&global.join("skills"), "alpha", "global copy");
        write_skill(&global.join("skills"), "beta", "only global");

        let agents = vec![agent_with_global(AgentKind::Cursor, &global)];
        let found = discover(&agents, &project, &[], None);

        let names: Vec<(&str, &SourceOrigin)> = found
            .iter()
            .map(|(s, src)| (s.name.as_str(), &src.origin))
            .collect();
        assert_eq!(
            names,
            vec![
                ("alpha", &SourceOrigin::Shared),
                ("alpha", &SourceOrigin::Agent("cursor".into())),
                ("beta", &SourceOrigin::Agent("cursor".into())),
            ]
        );
    }

    #[test]
    fn project_local_before_global() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        fs::create_dir_all(project.join(".git")).unwrap();
        write_skill(&project.join(".cursor/skills"), "alpha", "project copy");

        let global = tmp.path().join("cursor-global");
        write_skill(&global.join("skills"), "alpha", "global copy");

        let agents = vec![agent_with_global(AgentKind::Cursor, &global)];
        let found = discover(&agents, &project, &[], None);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1.path, project.join(".cursor/skills/alpha/SKILL.md"));
        assert_eq!(found[1].1.path, global.join("skills/alpha/SKILL.md"));
    }

    #[test]
    fn earlier_agent_global_outranks_later_agent_project_local() {
        let tmp = tempfile::tempdir().unwrap();
        let project = tmp.path().join("project");
        fs::create_dir_all(project.join(".git")).unwrap();
        write_skill(&project.join(".cursor/skills"), "alpha", "cursor project copy");

        let claude_global = tmp.path().join("claude-global");
        write_skill(&claude_global.join("skills"), "alpha", "claude global copy");

        let agents = vec![
            agent_with_global(AgentKind::Claude, &claude_global),
            agent_with_global(
                AgentKind::Cursor,
                &tmp.path().join("cursor-global-missing"),
            ),
        ];
        let found = discover(&agents, &project, &[], None);

        // One agent's sources are exhausted before the next agent's
        // project-local directories are considered.
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].1.path, claude_global.join("skills/alpha/SKILL.md"));
        assert_eq!(found[1].1.path, project.join(".cursor/skills/alpha/SKILL.md"));
    }

    #[test]
    fn invalid_skill_is_skipped_others_survive() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("global");
        write_skill(&global.join("skills"), "good-one", "fine");

        let bad = global.join("skills/bad-one");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join("SKILL.md"), "no front matter at all").unwrap();

        let agents = vec![agent_with_global(AgentKind::Claude, &global)];
        let found = discover(&agents, tmp.path(), &[], None);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.name, "good-one");
    }

    #[test]
    fn missing_directories_are_silent() {
        let tmp = tempfile::tempdir().unwrap();
        let agents = vec![agent_with_global(
            AgentKind::Codex,
            &tmp.path().join("never-created"),
        )];
        assert!(discover(&agents, tmp.path(), &[], None).is_empty());
    }

    #[test]
    fn remote_dirs_come_last() {
        let tmp = tempfile::tempdir().unwrap();
        let remote = tmp.path().join("extra-skills");
        write_skill(&remote, "gamma", "remote skill");

        let found = discover(&[], tmp.path(), &[remote.clone()], None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1.origin, SourceOrigin::Remote);
        assert_eq!(found[0].1.path, remote.join("gamma/SKILL.md"));
    }

    #[test]
    fn excluded_hub_is_not_discovered() {
        let tmp = tempfile::tempdir().unwrap();
        let hub = tmp.path().join("hub");
        write_skill(&hub, "alpha", "hub copy");

        let found = discover(&[], tmp.path(), &[hub.clone()], Some(&hub));
        assert!(found.is_empty());
    }

    #[test]
    fn same_directory_scanned_once() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("shared-global");
        write_skill(&global.join("skills"), "alpha", "one copy");

        let agents = vec![
            agent_with_global(AgentKind::Cursor, &global),
            agent_with_global(AgentKind::Claude, &global),
        ];
        let found = discover(&agents, tmp.path(), &[], None);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn disabled_agents_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("global");
        write_skill(&global.join("skills"), "alpha", "copy");

        let agent = Agent::with_config(
            AgentKind::Cursor,
            AgentConfig {
                enabled: false,
                global_path: Some(global.to_string_lossy().into_owned()),
            },
        );
        assert!(discover(&[agent], tmp.path(), &[], None).is_empty());
    }

    #[test]
    fn nested_skills_are_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("global");
        // One level too deep.
        write_skill(&global.join("skills/outer"), "inner", "too deep");

        let agents = vec![agent_with_global(AgentKind::Cursor, &global)];
        assert!(discover(&agents, tmp.path(), &[], None).is_empty());
    }
}
