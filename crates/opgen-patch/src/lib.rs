//! In-place patching of sentinel-delimited regions.
//!
//! A region runs from the first occurrence of a start sentinel to the first
//! occurrence of an end sentinel after it. Replacing it keeps everything
//! outside the region byte-for-byte. Replacement text must itself contain
//! both sentinels so the region can be found again on the next run; with
//! unchanged output a rerun writes nothing.

pub mod error;
pub mod patch_set;
pub mod splice;

pub use error::{PatchError, Result};
pub use patch_set::{PatchSet, PreparedFile};
pub use splice::{patch_file, splice};

use std::fmt;

/// Whether changed files are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatchMode {
    #[default]
    Write,
    /// Compute and report, never write.
    DryRun,
}

/// What happened to one target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Content already up to date; nothing written.
    Unchanged,
    Patched,
    /// Content differs but the run is a dry run.
    WouldPatch,
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchOutcome::Unchanged => write!(f, "unchanged"),
            PatchOutcome::Patched => write!(f, "patched"),
            PatchOutcome::WouldPatch => write!(f, "patch (dry run)"),
        }
    }
}
