//! Generated text blocks and their placement.

use std::fmt;

/// Which output file a block is patched into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TargetFile {
    Header,
    Source,
}

impl fmt::Display for TargetFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetFile::Header => write!(f, "header"),
            TargetFile::Source => write!(f, "source"),
        }
    }
}

/// Generated text for one sentinel-delimited region.
///
/// `text` always starts with `start` and contains `end` after it, so the
/// region stays locatable once patched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedBlock {
    pub target: TargetFile,
    pub start: &'static str,
    pub end: &'static str,
    pub text: String,
}

impl GeneratedBlock {
    pub(crate) fn from_lines(
        target: TargetFile,
        start: &'static str,
        end: &'static str,
        lines: &[String],
        sep: &str,
    ) -> Self {
        let block = GeneratedBlock {
            target,
            start,
            end,
            text: lines.join(sep),
        };
        tracing::debug!(
            file = %block.target,
            start = block.start,
            lines = lines.len(),
            bytes = block.text.len(),
            "generated block"
        );
        block
    }
}

/// Settings shared by every generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Tool name written into provenance comments.
    pub tool: String,
}

impl Default for EmitOptions {
    fn default() -> Self {
        EmitOptions {
            tool: "opgen".to_string(),
        }
    }
}

impl EmitOptions {
    pub(crate) fn do_not_edit(&self) -> String {
        format!("// Do not edit. Generated by {}", self.tool)
    }
}
