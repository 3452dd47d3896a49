//! Skill writing into an agent's directory layout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Maximum skill directory name length.
const NAME_MAX: usize = 64;

/// Returns `true` if `name` is safe to use as a skill directory name.
///
/// Only lowercase alphanumerics separated by single hyphens pass, which
/// rules out path separators, `..` traversal, and hidden directories.
#[must_use]
pub fn is_safe_skill_dirname(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= NAME_MAX
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !name.starts_with('-')
        && !name.ends_with('-')
        && !name.contains("--")
}

/// Writes `target_root/skills/<name>/SKILL.md` with the given content.
///
/// The write is atomic: content goes to a temp file in the skill's own
/// directory which is then renamed over `SKILL.md`. Nothing outside
/// `target_root/skills/<name>/` is touched.
///
/// # Errors
///
/// Returns [`Error::InvalidSkillName`] if the name is not a safe
/// directory name, and [`Error::PathUnwritable`] on permission failure
/// or a missing parent when `create_directories` is false.
pub fn write_skill_md(
    target_root: &Path,
    name: &str,
    content: &str,
    create_directories: bool,
) -> Result<PathBuf> {
    if !is_safe_skill_dirname(name) {
        return Err(Error::InvalidSkillName {
            name: name.to_string(),
        });
    }

    let skill_dir = target_root.join("skills").join(name);
    if create_directories {
        fs::create_dir_all(&skill_dir).map_err(|e| unwritable(skill_dir.clone(), e))?;
    } else if !skill_dir.is_dir() {
        return Err(Error::PathUnwritable {
            path: skill_dir,
            source: io::Error::new(io::ErrorKind::NotFound, "skill directory does not exist"),
        });
    }

    let path = skill_dir.join("SKILL.md");
    let tmp = skill_dir.join("SKILL.md.tmp");
    fs::write(&tmp, content).map_err(|e| unwritable(tmp.clone(), e))?;
    fs::rename(&tmp, &path).map_err(|e| unwritable(path.clone(), e))?;
    Ok(path)
}

fn unwritable(path: PathBuf, source: io::Error) -> Error {
    match source.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
            Error::PathUnwritable { path, source }
        }
        _ => Error::Io(source),
    }
}

/// Probes whether a directory is writable by creating and removing a
/// marker file.
#[must_use]
pub fn probe_writable(dir: &Path) -> bool {
    if !dir.is_dir() {
        return false;
    }
    let marker = dir.join(".agent-locate-probe");
    match fs::write(&marker, b"") {
        Ok(()) => {
            let _ = fs::remove_file(&marker);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_dirname_accepts_valid_names() {
        assert!(is_safe_skill_dirname("git-release"));
        assert!(is_safe_skill_dirname("a"));
        assert!(is_safe_skill_dirname("skill123"));
    }

    #[test]
    fn safe_dirname_rejects_traversal_and_separators() {
        assert!(!is_safe_skill_dirname(".."));
        assert!(!is_safe_skill_dirname("../escape"));
        assert!(!is_safe_skill_dirname("a/b"));
        assert!(!is_safe_skill_dirname("a\\b"));
        assert!(!is_safe_skill_dirname(".hidden"));
        assert!(!is_safe_skill_dirname(""));
        assert!(!is_safe_skill_dirname("-bad"));
        assert!(!is_safe_skill_dirname("bad-"));
        assert!(!is_safe_skill_dirname("has--double"));
        assert!(!is_safe_skill_dirname("Upper"));
        assert!(!is_safe_skill_dirname(&"a".repeat(65)));
    }

    #[test]
    fn write_creates_layout_and_content() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_skill_md(tmp.path(), "my-skill", "content here", true).unwrap();

        assert_eq!(path, tmp.path().join("skills/my-skill/SKILL.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content here");
        // No stray temp file left behind.
        assert!(!tmp.path().join("skills/my-skill/SKILL.md.tmp").exists());
    }

    #[test]
    fn write_rejects_unsafe_name() {
        let tmp = tempfile::tempdir().unwrap();
        let err = write_skill_md(tmp.path(), "../escape", "x", true).unwrap_err();
        assert!(matches!(err, Error::InvalidSkillName { .. }));
        assert!(!tmp.path().join("escape").exists());
    }

    #[test]
    fn write_without_create_directories_needs_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let err = write_skill_md(tmp.path(), "my-skill", "x", false).unwrap_err();
        assert!(matches!(err, Error::PathUnwritable { .. }));

        std::fs::create_dir_all(tmp.path().join("skills/my-skill")).unwrap();
        write_skill_md(tmp.path(), "my-skill", "x", false).unwrap();
    }

    #[test]
    fn write_overwrites_existing_skill() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill_md(tmp.path(), "my-skill", "old", true).unwrap();
        let path = write_skill_md(tmp.path(), "my-skill", "new", true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_leaves_sibling_skills_alone() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill_md(tmp.path(), "other-skill", "untouched", true).unwrap();
        write_skill_md(tmp.path(), "my-skill", "fresh", true).unwrap();

        let other = tmp.path().join("skills/other-skill/SKILL.md");
        assert_eq!(std::fs::read_to_string(other).unwrap(), "untouched");
    }

    #[test]
    fn probe_writable_reports_missing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(probe_writable(tmp.path()));
        assert!(!probe_writable(&tmp.path().join("missing")));
        assert!(!tmp.path().join(".agent-locate-probe").exists());
    }
}
