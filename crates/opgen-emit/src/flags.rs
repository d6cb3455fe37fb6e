//! `IROpFlag` bit enumeration (header).

use opgen_model::FlagVocabulary;

use crate::block::{EmitOptions, GeneratedBlock, TargetFile};
use crate::error::Result;

pub const START: &str = "typedef enum IROpFlag {";
pub const END: &str = "\n} IROpFlag;";

/// Name of the C enumerator for a flag.
pub fn flag_ident(name: &str) -> String {
    format!("IROpFlag{name}")
}

/// One bit per flag in vocabulary order.
pub fn flag_enum(flags: &FlagVocabulary, opts: &EmitOptions) -> Result<GeneratedBlock> {
    flags.validate()?;
    let width = flags.iter().map(|f| f.name.len()).max().unwrap_or(0);
    let mut lines = vec![
        START.to_string(),
        format!("  {}", opts.do_not_edit()),
        format!("  {} = 0,", flag_ident("None")),
    ];
    for (bit, flag) in flags.iter().enumerate() {
        lines.push(format!(
            "  IROpFlag{:<width$} = 1 << {bit:<2},// {}",
            flag.name, flag.doc
        ));
    }
    lines.push("} IROpFlag;".to_string());
    Ok(GeneratedBlock::from_lines(
        TargetFile::Header,
        START,
        END,
        &lines,
        "\n",
    ))
}
