//! `opgen.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "opgen.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpgenManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Spec and cross-reference inputs (required).
    pub inputs: InputsConfig,
    /// Patched target files (required).
    pub outputs: OutputsConfig,
    /// Run switches; command-line flags are OR-ed with these.
    #[serde(default)]
    pub run: RunConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
}

/// Files read on every run. Paths are relative to the manifest directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputsConfig {
    /// Operator spec (parenthesized-list format).
    pub spec: String,
    /// Header holding the `TYPE_CODES` X-macro.
    pub type_codes: String,
    /// Header holding the `TOKENS` X-macro.
    pub tokens: String,
}

/// Files patched on every run. Paths are relative to the manifest directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputsConfig {
    /// Header receiving the `IROp` and `IROpFlag` enums.
    pub header: String,
    /// Source receiving the name, constant, info and dispatch tables.
    pub source: String,
}

/// Run switches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunConfig {
    /// Compute and report patches without writing.
    #[serde(default)]
    pub dry_run: bool,
    /// Log diagnostics and echo every generated block.
    #[serde(default)]
    pub debug: bool,
}

/// Manifest paths resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub spec: PathBuf,
    pub type_codes: PathBuf,
    pub tokens: PathBuf,
    pub header: PathBuf,
    pub source: PathBuf,
}

impl OpgenManifest {
    /// Search upward from `start_dir` for an `opgen.toml` file, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let manifest = Self::load(&candidate)?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing opgen.toml")
    }

    pub fn paths(&self, project_dir: &Path) -> ProjectPaths {
        ProjectPaths {
            spec: project_dir.join(&self.inputs.spec),
            type_codes: project_dir.join(&self.inputs.type_codes),
            tokens: project_dir.join(&self.inputs.tokens),
            header: project_dir.join(&self.outputs.header),
            source: project_dir.join(&self.outputs.source),
        }
    }

    /// Generate the default template for `opgen init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[inputs]
spec = "src/ir/arch_base.lisp"
type-codes = "src/types.h"
tokens = "src/token.h"

[outputs]
header = "src/ir/op.h"
source = "src/ir/op.c"

[run]
dry-run = false
debug = false
"#
        )
    }
}
