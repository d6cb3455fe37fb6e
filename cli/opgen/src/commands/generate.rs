//! `opgen generate` — regenerate the operator tables and patch them in.

use std::path::Path;

use anyhow::{Context, Result};
use opgen_model::Tables;
use opgen_patch::{PatchMode, PatchOutcome};

use crate::manifest::OpgenManifest;
use crate::pipeline::{self, display_path};

/// Run the pipeline and patch the target files.
///
/// With `dry_run` nothing is written; with `debug` every generated block is
/// echoed to stdout.
pub fn run(project_dir: &Path, manifest: &OpgenManifest, dry_run: bool, debug: bool) -> Result<()> {
    let generated = pipeline::generate(project_dir, manifest, &Tables::builtin())?;

    if debug {
        for block in &generated.blocks {
            println!("{}", block.text);
        }
    }

    let mode = if dry_run {
        PatchMode::DryRun
    } else {
        PatchMode::Write
    };
    let outcomes = generated
        .patches
        .apply(mode)
        .context("patching target files")?;

    for (path, outcome) in &outcomes {
        let path = display_path(project_dir, path);
        match outcome {
            PatchOutcome::Patched => println!("opgen: patch {path}"),
            PatchOutcome::WouldPatch => println!("opgen: patch {path} (dry run)"),
            PatchOutcome::Unchanged => {}
        }
    }
    Ok(())
}
