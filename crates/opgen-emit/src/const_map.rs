//! Constant-operator lookup `_IROpConstMap` (source).
//!
//! For every canonical type code, the operator that materializes a constant
//! of that type. A type code's representation tags are tried most specific
//! first; the first tag with a `Constant` operator wins.

use opgen_model::{ArchDef, TypeCodeTable};

use crate::block::{EmitOptions, GeneratedBlock, TargetFile};
use crate::error::{EmitError, Result};

pub const START: &str = "const IROp _IROpConstMap[TypeCode_INTRINSIC_NUM_END] = {";
pub const END: &str = "\n};";

/// Type code → constant operator, in canonical type-code order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantLookup {
    entries: Vec<(String, String)>,
}

impl ConstantLookup {
    pub fn build(arch: &ArchDef, type_codes: &[String], table: &TypeCodeTable) -> Result<Self> {
        let constants = arch.constant_ops()?;
        let mut entries = Vec::with_capacity(type_codes.len());
        for code in type_codes {
            let tags = table.tags(code).ok_or_else(|| EmitError::UnknownTypeCode {
                type_code: code.clone(),
            })?;
            let op = tags
                .iter()
                .find_map(|tag| constants.get(tag.as_str()))
                .ok_or_else(|| EmitError::MissingConstant {
                    type_code: code.clone(),
                    tags: tags.to_vec(),
                })?;
            entries.push((code.clone(), op.name.clone()));
        }
        Ok(ConstantLookup { entries })
    }

    /// Constant operator for a type code.
    pub fn get(&self, type_code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(code, _)| code == type_code)
            .map(|(_, op)| op.as_str())
    }

    pub fn render(&self, opts: &EmitOptions) -> GeneratedBlock {
        let width = self.entries.iter().map(|(c, _)| c.len()).max().unwrap_or(0);
        let mut lines = vec![START.to_string(), format!("  {}", opts.do_not_edit())];
        for (code, op) in &self.entries {
            lines.push(format!("  /* TypeCode_{code:<width$} = */ Op{op},"));
        }
        lines.push("};".to_string());
        GeneratedBlock::from_lines(TargetFile::Source, START, END, &lines, "\n")
    }
}

pub fn const_map(
    arch: &ArchDef,
    type_codes: &[String],
    table: &TypeCodeTable,
    opts: &EmitOptions,
) -> Result<GeneratedBlock> {
    Ok(ConstantLookup::build(arch, type_codes, table)?.render(opts))
}
