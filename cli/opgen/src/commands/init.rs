//! `opgen init` — manifest scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{OpgenManifest, MANIFEST_FILE};

/// Write a template `opgen.toml` into `dir`.
pub fn run(dir: &Path, name: &str) -> Result<()> {
    let path = dir.join(MANIFEST_FILE);
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }
    fs::write(&path, OpgenManifest::template(name))
        .with_context(|| format!("writing {}", path.display()))?;

    println!("Created {MANIFEST_FILE} for '{name}'");
    println!("  edit [inputs] and [outputs] to match the project layout");
    Ok(())
}
