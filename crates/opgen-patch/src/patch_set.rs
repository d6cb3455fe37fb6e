//! Staged multi-region, multi-file patching.
//!
//! Regions are grouped per file. Every file is read once and all of its
//! regions are spliced in memory before anything is written, so a bad
//! sentinel in any file stops the run with all files untouched.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{PatchError, Result};
use crate::splice::{commit, read_target, splice};
use crate::{PatchMode, PatchOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    start: String,
    end: String,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StagedFile {
    path: PathBuf,
    regions: Vec<Region>,
}

/// Regions to patch, grouped by file in the order files were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSet {
    files: Vec<StagedFile>,
}

/// A file with all its regions spliced, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedFile {
    pub path: PathBuf,
    pub original: String,
    pub patched: String,
}

impl PreparedFile {
    pub fn is_changed(&self) -> bool {
        self.original != self.patched
    }
}

impl PatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a region. Regions of one file are spliced in the order added.
    pub fn add(
        &mut self,
        path: impl Into<PathBuf>,
        start: impl Into<String>,
        end: impl Into<String>,
        text: impl Into<String>,
    ) {
        let path = path.into();
        let region = Region {
            start: start.into(),
            end: end.into(),
            text: text.into(),
        };
        match self.files.iter_mut().find(|f| f.path == path) {
            Some(file) => file.regions.push(region),
            None => self.files.push(StagedFile {
                path,
                regions: vec![region],
            }),
        }
    }

    /// Read and splice every file without writing anything.
    pub fn prepare(&self) -> Result<Vec<PreparedFile>> {
        self.files.iter().map(prepare_file).collect()
    }

    /// Prepare everything, then write the files that changed.
    ///
    /// A write failure after earlier files were written leaves those files
    /// patched.
    pub fn apply(&self, mode: PatchMode) -> Result<Vec<(PathBuf, PatchOutcome)>> {
        let prepared = self.prepare()?;
        prepared
            .into_iter()
            .map(|file| {
                let outcome = commit(&file.path, &file.original, &file.patched, mode)?;
                Ok((file.path, outcome))
            })
            .collect()
    }
}

fn prepare_file(staged: &StagedFile) -> Result<PreparedFile> {
    let label = staged.path.display().to_string();
    let mut seen = HashSet::new();
    for region in &staged.regions {
        if !seen.insert(region.start.as_str()) {
            return Err(PatchError::DuplicateRegion {
                file: label,
                sentinel: region.start.clone(),
            });
        }
    }

    let original = read_target(&staged.path)?;
    let mut patched = original.clone();
    for region in &staged.regions {
        patched = splice(&label, &patched, &region.start, &region.end, &region.text)?;
    }
    tracing::debug!(
        file = %label,
        regions = staged.regions.len(),
        changed = patched != original,
        "prepared patch"
    );
    Ok(PreparedFile {
        path: staged.path.clone(),
        original,
        patched,
    })
}
