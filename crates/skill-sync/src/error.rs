//! Error types for skill parsing and synchronization.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort an operation outright.
///
/// Per-skill failures during a sync pass do not surface here; they are
/// collected into the pass summary so one bad skill cannot block the
/// rest.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A `SKILL.md` file could not be parsed.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// What went wrong.
        #[source]
        source: ParseError,
    },

    /// The central hub directory could not be created or opened.
    #[error("skill hub unavailable at {path}")]
    StoreUnavailable {
        /// The hub root.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The hub lock could not be acquired.
    #[error("could not lock skill hub at {path}")]
    LockFailed {
        /// The lock file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An adapter error bubbled up from path resolution or writing.
    #[error(transparent)]
    Adapter(#[from] agent_locate::Error),

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Reasons a `SKILL.md` file fails validation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The file does not start with a `---` front matter fence.
    #[error("missing YAML front matter")]
    MissingFrontMatter,

    /// The front matter is not valid YAML.
    #[error("invalid YAML front matter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// A required front matter field is absent or empty.
    #[error("missing required field '{field}'")]
    MissingRequiredField {
        /// The absent field.
        field: &'static str,
    },

    /// The skill name violates the naming rules.
    #[error("invalid skill name '{name}': must be lowercase alphanumeric with single hyphens, at most 64 characters")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The description is empty or longer than 1024 characters.
    #[error("description length {len} out of range (1..=1024 characters)")]
    DescriptionLength {
        /// The observed character count.
        len: usize,
    },
}
