//! `SKILL.md` parsing: YAML front matter extraction and validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, ParseError, Result};
use crate::types::Skill;

/// Maximum description length in characters.
const DESCRIPTION_MAX: usize = 1024;

#[derive(Debug, Deserialize)]
struct FrontMatter {
    name: Option<String>,
    description: Option<String>,
    license: Option<String>,
    compatibility: Option<String>,
    #[serde(default)]
    metadata: BTreeMap<String, serde_yaml::Value>,
}

/// SHA-256 hex digest of raw content bytes.
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Splits raw content into (front matter YAML, body).
///
/// The file must open with a `---` fence on its first line; the body is
/// everything after the closing fence line.
fn split_front_matter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))?;

    // The closing fence must be a line containing only `---`, up to
    // trailing whitespace. Lines such as `----` or `---text` belong to
    // the YAML block.
    let mut search_from = 0;
    loop {
        let end = rest[search_from..].find("\n---")? + search_from;
        let after_dashes = &rest[end + 4..];
        let (tail, body) = match after_dashes.find('\n') {
            Some(nl) => (&after_dashes[..nl], &after_dashes[nl + 1..]),
            None => (after_dashes, ""),
        };
        if tail.chars().all(|c| matches!(c, ' ' | '\t' | '\r')) {
            return Some((&rest[..end], body));
        }
        search_from = end + 1;
    }
}

/// Parses and validates a skill from raw `SKILL.md` content.
///
/// The fingerprint is computed over the exact bytes given, so any byte
/// change (including whitespace) yields a different fingerprint.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first validation failure.
pub fn parse_str(raw: &str) -> std::result::Result<Skill, ParseError> {
    let (yaml, body) = split_front_matter(raw).ok_or(ParseError::MissingFrontMatter)?;
    let front: FrontMatter = serde_yaml::from_str(yaml)?;

    let name = front
        .name
        .filter(|n| !n.is_empty())
        .ok_or(ParseError::MissingRequiredField { field: "name" })?;
    if !agent_locate::is_safe_skill_dirname(&name) {
        return Err(ParseError::InvalidName { name });
    }

    let description = front
        .description
        .ok_or(ParseError::MissingRequiredField {
            field: "description",
        })?;
    let len = description.chars().count();
    if len == 0 || len > DESCRIPTION_MAX {
        return Err(ParseError::DescriptionLength { len });
    }

    Ok(Skill {
        name,
        description,
        license: front.license,
        compatibility: front.compatibility,
        metadata: front.metadata,
        body: body.to_string(),
        raw: raw.to_string(),
        fingerprint: fingerprint(raw.as_bytes()),
    })
}

/// Reads and parses a `SKILL.md` file.
///
/// # Errors
///
/// Returns [`Error::Parse`] with the path attached for validation
/// failures and [`Error::Io`] for read failures.
pub fn parse_file(path: &Path) -> Result<Skill> {
    let raw = fs::read_to_string(path)?;
    parse_str(&raw).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "---\nname: git-release\ndescription: Cut a release from the current branch.\n---\n# Git release\n\nSteps here.\n";

    #[test]
    fn parses_valid_skill() {
        let skill = parse_str(VALID).unwrap();
        assert_eq!(skill.name, "git-release");
        assert_eq!(
            skill.description,
            "Cut a release from the current branch."
        );
        assert_eq!(skill.body, "# Git release\n\nSteps here.\n");
        assert_eq!(skill.raw, VALID);
        assert_eq!(skill.fingerprint.len(), 64);
    }

    #[test]
    fn parses_optional_fields() {
        let raw = "---\nname: review\ndescription: Review code.\nlicense: MIT\ncompatibility: claude, cursor\nmetadata:\n  author: someone\n---\nbody\n";
        let skill = parse_str(raw).unwrap();
        assert_eq!(skill.license.as_deref(), Some("MIT"));
        assert_eq!(skill.compatibility.as_deref(), Some("claude, cursor"));
        assert_eq!(
            skill.metadata.get("author"),
            Some(&serde_yaml::Value::String("someone".into()))
        );
    }

    #[test]
    fn fingerprint_is_byte_exact() {
        let a = parse_str(VALID).unwrap();
        let b = parse_str(&VALID.replace("Steps", "Steps ")).unwrap();
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn rejects_missing_front_matter() {
        let err = parse_str("# Just markdown\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingFrontMatter));
    }

    #[test]
    fn rejects_unclosed_front_matter() {
        let err = parse_str("---\nname: x\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingFrontMatter));
    }

    #[test]
    fn dash_prefixed_lines_do_not_close_front_matter() {
        // `---junk` is YAML content, not a fence. Only a dash-only line
        // ends the block.
        let raw = "---\nname: ok\ndescription: d\nmetadata:\n  note: x\n---junk: kept\n---\nbody line\n";
        let skill = parse_str(raw).unwrap();
        assert_eq!(skill.body, "body line\n");
    }

    #[test]
    fn dash_divider_does_not_leak_into_body() {
        // A `----` line stays in the front matter (where it fails YAML
        // parsing) instead of closing the fence a byte early and
        // leaking a stray `-` into the body.
        let raw = "---\nname: ok\ndescription: d\n----\n---\nbody\n";
        let err = parse_str(raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidYaml(_)));
    }

    #[test]
    fn closing_fence_allows_trailing_whitespace() {
        let skill = parse_str("---\nname: ok\ndescription: d\n--- \t\nbody\n").unwrap();
        assert_eq!(skill.body, "body\n");
    }

    #[test]
    fn rejects_missing_name() {
        let err = parse_str("---\ndescription: d\n---\nbody\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::MissingRequiredField { field: "name" }
        ));
    }

    #[test]
    fn rejects_bad_names() {
        for name in ["Has-Upper", "double--hyphen", "-lead", "trail-", "a b"] {
            let raw = format!("---\nname: {name}\ndescription: d\n---\nbody\n");
            let err = parse_str(&raw).unwrap_err();
            assert!(matches!(err, ParseError::InvalidName { .. }), "{name}");
        }
    }

    #[test]
    fn rejects_overlong_description() {
        let long = "x".repeat(1025);
        let raw = format!("---\nname: ok\ndescription: {long}\n---\nbody\n");
        let err = parse_str(&raw).unwrap_err();
        assert!(matches!(err, ParseError::DescriptionLength { len: 1025 }));
    }

    #[test]
    fn description_length_counts_characters_not_bytes() {
        // 1024 multibyte characters must pass.
        let desc = "é".repeat(1024);
        let raw = format!("---\nname: ok\ndescription: {desc}\n---\nbody\n");
        assert!(parse_str(&raw).is_ok());
    }

    #[test]
    fn rejects_invalid_yaml() {
        let err = parse_str("---\nname: [unclosed\n---\nbody\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidYaml(_)));
    }

    #[test]
    fn empty_body_is_allowed() {
        let skill = parse_str("---\nname: ok\ndescription: d\n---\n").unwrap();
        assert_eq!(skill.body, "");
    }

    #[test]
    fn parse_file_attaches_path() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("SKILL.md");
        std::fs::write(&path, "no front matter").unwrap();

        let err = parse_file(&path).unwrap_err();
        match err {
            Error::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
