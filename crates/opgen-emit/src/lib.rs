//! Generators for the IR operator tables.
//!
//! Each generator is a pure function of the operator model, the
//! configuration tables and the scanned enumerations, and returns a
//! [`GeneratedBlock`]: the full text of one sentinel-delimited region,
//! sentinels included.
//!
//! | Block            | Target | Start sentinel                                   |
//! |------------------|--------|--------------------------------------------------|
//! | operator enum    | header | `typedef enum IROp {`                            |
//! | flag enum        | header | `typedef enum IROpFlag {`                        |
//! | operator names   | source | `const char* const IROpNames[Op_MAX] = {`        |
//! | constant lookup  | source | `const IROp _IROpConstMap[...] = {`              |
//! | dispatch switch  | source | `  //!BEGIN_AST_TO_IR_OP_SWITCHES`               |
//! | operator info    | source | `const IROpDescr _IROpInfoMap[Op_MAX] = {`       |

pub mod block;
pub mod const_map;
pub mod dispatch;
pub mod error;
pub mod flags;
pub mod op_enum;
pub mod op_info;
pub mod op_names;

pub use block::{EmitOptions, GeneratedBlock, TargetFile};
pub use const_map::{const_map, ConstantLookup};
pub use dispatch::{DispatchCase, DispatchTable};
pub use error::{EmitError, Result};
pub use flags::flag_enum;
pub use op_enum::op_enum;
pub use op_info::op_info;
pub use op_names::op_names;

use opgen_model::{ArchDef, Tables};
use opgen_xref::AstToken;

/// Everything the generators read.
#[derive(Debug, Clone, Copy)]
pub struct EmitInputs<'a> {
    pub arch: &'a ArchDef,
    pub tables: &'a Tables,
    /// Canonical type codes in scanned order.
    pub type_codes: &'a [String],
    /// Operator tokens in scanned order.
    pub tokens: &'a [AstToken],
}

/// Run every generator. Any failure aborts the whole run.
pub fn generate_all(inputs: EmitInputs<'_>, opts: &EmitOptions) -> Result<Vec<GeneratedBlock>> {
    let EmitInputs {
        arch,
        tables,
        type_codes,
        tokens,
    } = inputs;
    let blocks = vec![
        op_enum(arch, opts),
        op_names(arch, opts),
        const_map(arch, type_codes, &tables.type_codes, opts)?,
        DispatchTable::build(arch, type_codes, &tables.type_codes, tokens, &tables.ast_ops)?
            .render(opts),
        flag_enum(&tables.flags, opts)?,
        op_info(arch, type_codes, &tables.type_codes, &tables.flags, opts),
    ];
    tracing::debug!(blocks = blocks.len(), ops = arch.ops.len(), "generated all blocks");
    Ok(blocks)
}
