//! Error types for agent path resolution and skill writing.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from path resolution and skill writing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The home directory could not be determined.
    #[error("home directory could not be determined")]
    HomeNotFound,

    /// The skill name cannot be used as a directory name.
    #[error("invalid skill name '{name}': must be lowercase alphanumeric with single hyphens")]
    InvalidSkillName {
        /// The rejected name.
        name: String,
    },

    /// A target path could not be written (permissions or missing parent).
    #[error("path is not writable: {path}")]
    PathUnwritable {
        /// The path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
