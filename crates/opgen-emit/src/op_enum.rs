//! `IROp` enumeration (header).

use opgen_model::ArchDef;

use crate::block::{EmitOptions, GeneratedBlock, TargetFile};

pub const START: &str = "typedef enum IROp {";
pub const END: &str = "} IROp;";

/// One enumerator per operator in declaration order, with the source file's
/// comments carried along, followed by `Op_MAX`.
pub fn op_enum(arch: &ArchDef, opts: &EmitOptions) -> GeneratedBlock {
    let mut lines = vec![
        START.to_string(),
        format!(
            "  // generated by {} from {}",
            opts.tool,
            arch.source_path.display()
        ),
    ];
    for op in &arch.ops {
        lines.extend(op.pre_comments.iter().map(|c| format!("  //{c}")));
        let post = op.post_comments.join(" ");
        if post.is_empty() {
            lines.push(format!("  Op{},", op.name));
        } else {
            lines.push(format!("  Op{},\t//{post}", op.name));
        }
    }
    lines.extend(arch.tail_comments.iter().map(|c| format!("  //{c}")));
    lines.push(String::new());
    lines.push("  Op_MAX".to_string());
    lines.push(END.to_string());
    GeneratedBlock::from_lines(TargetFile::Header, START, END, &lines, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use opgen_model::FlagVocabulary;
    use pretty_assertions::assert_eq;

    #[test]
    fn enum_with_comments() {
        let arch = ArchDef::parse(
            "src/ir/arch_base.lisp",
            "\
(ops
  (Nil () -> nil ZeroWidth)
  ; constants
  (ConstI32 () -> i32 Constant) ; aux is int32
  (AddI32 (i32 i32) -> i32 Commutative)
  ; end of list
)
",
            &FlagVocabulary::builtin(),
        )
        .unwrap();
        let block = op_enum(&arch, &EmitOptions::default());
        assert_eq!(block.target, TargetFile::Header);
        assert_eq!(
            block.text,
            "\
typedef enum IROp {
  // generated by opgen from src/ir/arch_base.lisp
  OpNil,
  // constants
  OpConstI32,\t// aux is int32
  OpAddI32,
  // end of list

  Op_MAX
} IROp;"
        );
    }

    #[test]
    fn empty_comment_lines_kept() {
        let arch = ArchDef::parse(
            "a.lisp",
            "(ops\n  ;\n  (A () -> i32)\n)\n",
            &FlagVocabulary::builtin(),
        )
        .unwrap();
        let block = op_enum(&arch, &EmitOptions::default());
        assert!(block.text.contains("\n  //\n  OpA,\n"));
    }
}
