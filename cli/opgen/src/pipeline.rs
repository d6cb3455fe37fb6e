//! The generation pipeline shared by `generate` and `check`.
//!
//! Loads the two authoritative enumerations and the operator spec, runs every
//! generator, and stages the resulting blocks per target file. Nothing is
//! read from or written to the target files here.

use std::path::Path;

use anyhow::{Context, Result};
use opgen_emit::{generate_all, EmitInputs, EmitOptions, GeneratedBlock, TargetFile};
use opgen_model::{ArchDef, Tables};
use opgen_patch::PatchSet;
use opgen_xref::{load_ast_tokens, load_type_codes};

use crate::manifest::OpgenManifest;

/// Generated blocks and the patch set that places them.
#[derive(Debug)]
pub struct Generated {
    pub blocks: Vec<GeneratedBlock>,
    pub patches: PatchSet,
}

pub fn generate(project_dir: &Path, manifest: &OpgenManifest, tables: &Tables) -> Result<Generated> {
    let paths = manifest.paths(project_dir);

    let type_codes = load_type_codes(&paths.type_codes, &tables.type_codes)
        .with_context(|| format!("loading type codes from {}", paths.type_codes.display()))?;
    let tokens = load_ast_tokens(&paths.tokens, &tables.ast_ops)
        .with_context(|| format!("loading operator tokens from {}", paths.tokens.display()))?;

    let spec_text = std::fs::read_to_string(&paths.spec)
        .with_context(|| format!("reading {}", paths.spec.display()))?;
    let arch = ArchDef::parse(&manifest.inputs.spec, &spec_text, &tables.flags)
        .with_context(|| format!("building operator model from {}", paths.spec.display()))?;

    let inputs = EmitInputs {
        arch: &arch,
        tables,
        type_codes: &type_codes.codes,
        tokens: &tokens,
    };
    let blocks = generate_all(inputs, &EmitOptions::default()).context("generating tables")?;

    let mut patches = PatchSet::new();
    for block in &blocks {
        let target = match block.target {
            TargetFile::Header => &paths.header,
            TargetFile::Source => &paths.source,
        };
        patches.add(target.clone(), block.start, block.end, block.text.clone());
    }
    Ok(Generated { blocks, patches })
}

/// `path` relative to the project directory, for messages.
pub fn display_path<'a>(project_dir: &Path, path: &'a Path) -> std::path::Display<'a> {
    path.strip_prefix(project_dir).unwrap_or(path).display()
}
