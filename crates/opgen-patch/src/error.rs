//! Patch error types.

use std::path::PathBuf;

/// Errors raised while locating or replacing a region.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("can't find {sentinel:?} in {file}")]
    SentinelNotFound { file: String, sentinel: String },

    /// Writing the replacement would leave the region unlocatable.
    #[error(
        "can't find {sentinel:?} in replacement text for {file}; writing would break later runs. \
         To rename a sentinel, rename it in the target file first"
    )]
    ReplacementMissingSentinel { file: String, sentinel: String },

    /// The replacement does not begin at `start` or closes before its last
    /// byte, so the next run would find a different region.
    #[error(
        "replacement text for {file} must begin with {start:?} and end at its first {end:?}; \
         the end sentinel appears early or extra text surrounds the region"
    )]
    UnframedReplacement {
        file: String,
        start: String,
        end: String,
    },

    #[error("region {sentinel:?} staged more than once for {file}")]
    DuplicateRegion { file: String, sentinel: String },
}

/// Result type alias for patch operations.
pub type Result<T> = std::result::Result<T, PatchError>;
