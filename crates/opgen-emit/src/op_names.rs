//! `IROpNames` string table (source).

use opgen_model::ArchDef;

use crate::block::{EmitOptions, GeneratedBlock, TargetFile};

pub const START: &str = "const char* const IROpNames[Op_MAX] = {";
pub const END: &str = "};";

/// Operator names in enum order.
pub fn op_names(arch: &ArchDef, opts: &EmitOptions) -> GeneratedBlock {
    let mut lines = vec![START.to_string(), format!("  {}", opts.do_not_edit())];
    lines.extend(arch.ops.iter().map(|op| format!("  \"{}\",", op.name)));
    lines.push(END.to_string());
    GeneratedBlock::from_lines(TargetFile::Source, START, END, &lines, "\n")
}
