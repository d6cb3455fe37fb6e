//! Per-operator descriptor table `_IROpInfoMap` (source).

use opgen_model::{ArchDef, FlagVocabulary, OpDef, TypeCodeTable};

use crate::block::{EmitOptions, GeneratedBlock, TargetFile};
use crate::flags::flag_ident;

pub const START: &str = "const IROpDescr _IROpInfoMap[Op_MAX] = {";
pub const END: &str = "\n};";

/// Type code an operator produces: the first canonical code whose tags
/// include the operator's single output tag, else `nil`.
pub fn output_type_code<'a>(op: &OpDef, type_codes: &'a [String], table: &TypeCodeTable) -> &'a str {
    let Some(tag) = op.output.single() else {
        return "nil";
    };
    type_codes
        .iter()
        .find(|code| {
            table
                .tags(code)
                .is_some_and(|tags| tags.iter().any(|t| t == tag))
        })
        .map_or("nil", String::as_str)
}

/// `{ outputType, flags }` per operator, in enum order.
pub fn op_info(
    arch: &ArchDef,
    type_codes: &[String],
    table: &TypeCodeTable,
    flags: &FlagVocabulary,
    opts: &EmitOptions,
) -> GeneratedBlock {
    let mut lines = vec![START.to_string(), format!("  {}", opts.do_not_edit())];
    for op in &arch.ops {
        let code = output_type_code(op, type_codes, table);
        let set: Vec<String> = flags
            .iter()
            .filter(|f| op.has_flag(&f.name))
            .map(|f| flag_ident(&f.name))
            .collect();
        let set = if set.is_empty() {
            flag_ident("None")
        } else {
            set.join(" | ")
        };
        lines.push(format!("  {{ TypeCode_{code}, {set} }},"));
    }
    lines.push("};".to_string());
    GeneratedBlock::from_lines(TargetFile::Source, START, END, &lines, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn descriptors_per_op() {
        let flags = FlagVocabulary::builtin();
        let arch = ArchDef::parse(
            "a.lisp",
            "(ops
               (Nil () -> nil ZeroWidth)
               (AddI32 (i32 i32) -> i32 ResultInArg0 Commutative)
               (ConstU8 () -> u8 Constant)
               (Pair (i32 i32) -> (i32 i32)))",
            &flags,
        )
        .unwrap();
        let table = TypeCodeTable::builtin();
        let codes: Vec<String> = table.names().map(str::to_string).collect();
        let block = op_info(&arch, &codes, &table, &flags, &EmitOptions::default());
        assert_eq!(
            block.text,
            "\
const IROpDescr _IROpInfoMap[Op_MAX] = {
  // Do not edit. Generated by opgen
  { TypeCode_nil, IROpFlagZeroWidth },
  { TypeCode_int32, IROpFlagCommutative | IROpFlagResultInArg0 },
  { TypeCode_uint8, IROpFlagConstant },
  { TypeCode_nil, IROpFlagNone },
};"
        );
    }
}
