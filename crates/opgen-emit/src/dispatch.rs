//! Source-operator → IR-operator dispatch (source).
//!
//! Maps `(token, type1, type2)` to an IR operator, where `type2` is `nil` for
//! one-input operators. Candidates come from the token's name prefixes: the
//! one-input prefix selects among one-input operators, the two-input prefix
//! among two-input operators. A prefix never selects an operator of the other
//! arity even when the name matches, so a token whose one-input prefix is
//! `Neg` ignores a two-input `NegI32`. A type code's representation tags are
//! tried most specific first and the first operator found for a token wins.
//!
//! Rendered as nested C `switch` statements:
//!
//! ```text
//! switch (type1) {
//!   case TypeCode_int32:
//!     switch (type2) {
//!       case TypeCode_int32: switch (tok) {
//!         case TPlus : return OpAddI32 ;// i32 i32 -> i32
//!         default: return OpNil;
//!       }
//!       default: return OpNil;
//!     } // switch (type2)
//!   default: return OpNil;
//! } // switch (type1)
//! ```

use std::collections::{HashMap, HashSet};

use opgen_model::{ArchDef, AstOpTable, OpDef, TypeCodeTable};
use opgen_xref::AstToken;

use crate::block::{EmitOptions, GeneratedBlock, TargetFile};
use crate::error::{EmitError, Result};

pub const START: &str = "  //!BEGIN_AST_TO_IR_OP_SWITCHES";
pub const END: &str = "  //!END_AST_TO_IR_OP_SWITCHES";

/// Type code used for the second operand of one-input operators.
pub const UNARY_TYPE: &str = "nil";

/// One `case` of an inner `switch (tok)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchCase {
    pub token: String,
    pub op: String,
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    type1: String,
    /// `(type2, cases)`; `type2` is [`UNARY_TYPE`] for the one-input slot.
    columns: Vec<(String, Vec<DispatchCase>)>,
}

/// The full dispatch structure in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    rows: Vec<Row>,
}

impl DispatchTable {
    pub fn build(
        arch: &ArchDef,
        type_codes: &[String],
        table: &TypeCodeTable,
        tokens: &[AstToken],
        ast_ops: &AstOpTable,
    ) -> Result<Self> {
        let by_input = index_by_input(arch, tokens, ast_ops);
        let tags_of = |code: &str| {
            table.tags(code).ok_or_else(|| EmitError::UnknownTypeCode {
                type_code: code.to_string(),
            })
        };

        let mut rows = Vec::with_capacity(type_codes.len());
        for type1 in type_codes {
            let tags1 = tags_of(type1)?;
            let mut columns = Vec::new();

            let unary = collect_cases(tags1.iter().cloned(), &by_input);
            if !unary.is_empty() {
                columns.push((UNARY_TYPE.to_string(), unary));
            }

            for type2 in type_codes {
                let tags2 = tags_of(type2)?;
                let keys = tags1
                    .iter()
                    .flat_map(|t1| tags2.iter().map(move |t2| format!("{t1} {t2}")));
                let cases = collect_cases(keys, &by_input);
                if !cases.is_empty() {
                    columns.push((type2.clone(), cases));
                }
            }
            rows.push(Row {
                type1: type1.clone(),
                columns,
            });
        }

        let table = DispatchTable { rows };
        tracing::debug!(cases = table.case_count(), "built dispatch table");
        Ok(table)
    }

    /// IR operator for `token` applied to `type1` (and `type2` for two inputs).
    pub fn lookup(&self, token: &str, type1: &str, type2: Option<&str>) -> Option<&str> {
        let type2 = type2.unwrap_or(UNARY_TYPE);
        let row = self.rows.iter().find(|r| r.type1 == type1)?;
        let (_, cases) = row.columns.iter().find(|(t, _)| t == type2)?;
        cases
            .iter()
            .find(|c| c.token == token)
            .map(|c| c.op.as_str())
    }

    pub fn case_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.columns)
            .map(|(_, cases)| cases.len())
            .sum()
    }

    pub fn render(&self, opts: &EmitOptions) -> GeneratedBlock {
        let mut lines = vec![
            START.to_string(),
            opts.do_not_edit(),
            "switch (type1) {".to_string(),
        ];
        for row in &self.rows {
            lines.push(format!("  case TypeCode_{}:", row.type1));
            lines.push("    switch (type2) {".to_string());
            for (type2, cases) in &row.columns {
                render_cases(&mut lines, type2, cases);
            }
            lines.push("      default: return OpNil;".to_string());
            lines.push("    } // switch (type2)".to_string());
        }
        lines.push("  default: return OpNil;".to_string());
        lines.push("} // switch (type1)".to_string());
        lines.push(END.to_string());
        GeneratedBlock::from_lines(TargetFile::Source, START, END, &lines, "\n  ")
    }
}

/// Input signature key → `(token, op)` candidates, grouped by token in
/// canonical token order and by operator in declaration order.
fn index_by_input<'a>(
    arch: &'a ArchDef,
    tokens: &'a [AstToken],
    ast_ops: &AstOpTable,
) -> HashMap<String, Vec<(&'a str, &'a OpDef)>> {
    let mut by_input: HashMap<String, Vec<(&str, &OpDef)>> = HashMap::new();
    for token in tokens {
        let Some(prefixes) = ast_ops.get(&token.name) else {
            continue;
        };
        for op in &arch.ops {
            let matches = prefixes
                .for_arity(op.input.arity())
                .is_some_and(|prefix| op.name.starts_with(prefix));
            if matches {
                by_input
                    .entry(op.input.key())
                    .or_default()
                    .push((token.name.as_str(), op));
            }
        }
    }
    by_input
}

/// Candidates for `keys` in order, keeping the first operator per token.
fn collect_cases(
    keys: impl Iterator<Item = String>,
    by_input: &HashMap<String, Vec<(&str, &OpDef)>>,
) -> Vec<DispatchCase> {
    let mut seen = HashSet::new();
    let mut cases = Vec::new();
    for key in keys {
        for &(token, op) in by_input.get(&key).into_iter().flatten() {
            if seen.insert(token) {
                cases.push(DispatchCase {
                    token: token.to_string(),
                    op: op.name.clone(),
                    input: op.input.key(),
                    output: op.output.key(),
                });
            }
        }
    }
    cases
}

fn render_cases(lines: &mut Vec<String>, type2: &str, cases: &[DispatchCase]) {
    let tok_width = cases.iter().map(|c| c.token.len()).max().unwrap_or(0);
    let op_width = cases.iter().map(|c| c.op.len()).max().unwrap_or(0);
    lines.push(format!("      case TypeCode_{type2}: switch (tok) {{"));
    for c in cases {
        lines.push(format!(
            "        case {:<tok_width$} : return Op{:<op_width$} ;// {} -> {}",
            c.token, c.op, c.input, c.output
        ));
    }
    lines.push("        default: return OpNil;".to_string());
    lines.push("      }".to_string());
}
