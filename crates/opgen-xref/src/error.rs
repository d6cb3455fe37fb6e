//! Cross-reference error types.

use std::path::PathBuf;

/// Errors raised while scanning an authoritative enumeration.
#[derive(Debug, thiserror::Error)]
pub enum XrefError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to find {marker:?} in {file}")]
    StartNotFound { file: String, marker: String },

    #[error("unable to find ending value {marker:?} in {file}")]
    EndNotFound { file: String, marker: String },

    #[error("{name:?} listed more than once in {file}")]
    Duplicate { file: String, name: String },

    /// Scanned and declared names differ. Both directions are listed.
    #[error(
        "{what} in {file} do not match the declared table; unknown: [{}]; missing: [{}]",
        unknown.join(", "),
        missing.join(", ")
    )]
    Mismatch {
        file: String,
        what: &'static str,
        /// Scanned but not declared.
        unknown: Vec<String>,
        /// Declared but not scanned.
        missing: Vec<String>,
    },
}

/// Result type alias for cross-reference operations.
pub type Result<T> = std::result::Result<T, XrefError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_lists_both_directions() {
        let err = XrefError::Mismatch {
            file: "types.h".into(),
            what: "type codes",
            unknown: vec!["int128".into()],
            missing: vec!["float32".into(), "float64".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("unknown: [int128]"));
        assert!(msg.contains("missing: [float32, float64]"));
    }
}
