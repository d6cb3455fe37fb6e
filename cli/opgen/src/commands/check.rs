//! `opgen check` — fail when generated regions are out of date.

use std::path::Path;

use anyhow::{bail, Result};
use opgen_model::Tables;

use crate::manifest::OpgenManifest;
use crate::pipeline::{self, display_path};

pub fn run(project_dir: &Path, manifest: &OpgenManifest) -> Result<()> {
    let generated = pipeline::generate(project_dir, manifest, &Tables::builtin())?;
    let prepared = generated.patches.prepare()?;

    let stale: Vec<_> = prepared.iter().filter(|f| f.is_changed()).collect();
    if stale.is_empty() {
        println!("opgen: {} file(s) up to date", prepared.len());
        return Ok(());
    }
    for file in &stale {
        eprintln!("out of date: {}", display_path(project_dir, &file.path));
    }
    bail!(
        "{} file(s) out of date; run `opgen generate` to update",
        stale.len()
    )
}
