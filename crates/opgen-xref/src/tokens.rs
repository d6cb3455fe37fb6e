//! Source-operator token loader.
//!
//! Scans the `TOKENS` X-macro of the scanner header and collects the tokens
//! between `T_OPS_START` and `T_OPS_END`:
//!
//! ```text
//! #define TOKENS(_) \
//!   _( TComma      , ",")  \
//!   _( T_OPS_START , "")   \
//!   _( TPlus       , "+")  \
//!   _( T_OPS_END   , "")   \
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use opgen_model::AstOpTable;
use regex::Regex;

use crate::error::{Result, XrefError};
use crate::{check_set_equal, insert_unique, read_file};

pub const START_MARKER: &str = "#define TOKENS(";
pub const OPS_START: &str = "T_OPS_START";
pub const OPS_END: &str = "T_OPS_END";

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*_\(\s*(\w+)\s*,\s*"([^"]*)""#).expect("token entry pattern")
});

/// An operator token and its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstToken {
    pub name: String,
    pub text: String,
}

/// Read `path` and scan it with [`scan_ast_tokens`].
pub fn load_ast_tokens(path: &Path, table: &AstOpTable) -> Result<Vec<AstToken>> {
    let text = read_file(path)?;
    scan_ast_tokens(&path.display().to_string(), &text, table)
}

/// Scan header text for operator tokens and check them against `table`.
pub fn scan_ast_tokens(file: &str, text: &str, table: &AstOpTable) -> Result<Vec<AstToken>> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|line| line.contains(START_MARKER)) {
        return Err(XrefError::StartNotFound {
            file: file.to_string(),
            marker: START_MARKER.to_string(),
        });
    }

    let mut tokens: Vec<(&str, &str)> = Vec::new();
    let mut seen = HashSet::new();
    let mut in_ops = false;
    let mut ended = false;

    for line in lines {
        let Some(caps) = ENTRY_RE.captures(line) else {
            continue;
        };
        let (Some(name), Some(repr)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let name = name.as_str();
        if !in_ops {
            in_ops = name == OPS_START;
            continue;
        }
        if name == OPS_END {
            ended = true;
            break;
        }
        insert_unique(file, &mut seen, name)?;
        tokens.push((name, repr.as_str()));
    }

    if !in_ops {
        return Err(XrefError::StartNotFound {
            file: file.to_string(),
            marker: OPS_START.to_string(),
        });
    }
    if !ended {
        return Err(XrefError::EndNotFound {
            file: file.to_string(),
            marker: OPS_END.to_string(),
        });
    }
    let names: Vec<&str> = tokens.iter().map(|&(name, _)| name).collect();
    check_set_equal(file, "operator tokens", &names, table.names())?;

    tracing::debug!(file, tokens = tokens.len(), "scanned operator tokens");
    Ok(tokens
        .into_iter()
        .map(|(name, text)| AstToken {
            name: name.to_string(),
            text: text.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use opgen_model::OpPrefixes;

    const TOKEN_H: &str = r#"#pragma once
#define TOKENS(_) \
  _( TComma      , ",")  \
  _( TSemi       , ";")  \
  _( T_OPS_START , "") /* start of operator tokens */ \
  _( TPlus       , "+")  \
  _( TMinus      , "-")  \
  _( TStar       , "*")  \
  _( TSlash      , "/")  \
  _( TGt         , ">")  \
  _( TLt         , "<")  \
  _( TEqEq       , "==") \
  _( TNEq        , "!=") \
  _( TLEq        , "<=") \
  _( TGEq        , ">=") \
  _( TPlusPlus   , "++") \
  _( TMinusMinus , "--") \
  _( TTilde      , "~")  \
  _( TBang       , "!")  \
  _( T_OPS_END   , "") /* end of operator tokens */ \
  _( TLParen     , "(") \
  _( TIdent      , "identifier") \
/*END TOKENS*/
"#;

    fn plus_minus() -> AstOpTable {
        AstOpTable::new([
            ("TPlus", OpPrefixes::new(None, Some("Add"))),
            ("TMinus", OpPrefixes::new(Some("Neg"), Some("Sub"))),
        ])
        .unwrap()
    }

    #[test]
    fn scans_operator_range() {
        let tokens = scan_ast_tokens("token.h", TOKEN_H, &AstOpTable::builtin()).unwrap();
        assert_eq!(tokens.len(), 14);
        assert_eq!(
            tokens[0],
            AstToken {
                name: "TPlus".into(),
                text: "+".into()
            }
        );
        assert_eq!(tokens[13].name, "TBang");
        assert_eq!(tokens[13].text, "!");
    }

    #[test]
    fn missing_start_marker() {
        let err = scan_ast_tokens("t.h", "_( TPlus, \"+\")\n", &plus_minus()).unwrap_err();
        assert!(matches!(err, XrefError::StartNotFound { marker, .. } if marker == START_MARKER));
    }

    #[test]
    fn missing_ops_start() {
        let text = "#define TOKENS(_) \\\n_( TPlus, \"+\")\n_( T_OPS_END, \"\")\n";
        let err = scan_ast_tokens("t.h", text, &plus_minus()).unwrap_err();
        assert!(matches!(err, XrefError::StartNotFound { marker, .. } if marker == OPS_START));
    }

    #[test]
    fn missing_ops_end() {
        let text = "#define TOKENS(_) \\\n_( T_OPS_START, \"\")\n_( TPlus, \"+\")\n_( TMinus, \"-\")\n";
        let err = scan_ast_tokens("t.h", text, &plus_minus()).unwrap_err();
        assert!(matches!(err, XrefError::EndNotFound { marker, .. } if marker == OPS_END));
    }

    #[test]
    fn mismatch_lists_every_name() {
        let text = "#define TOKENS(_) \\\n_( T_OPS_START, \"\")\n_( TPlus, \"+\")\n_( TPercent, \"%\")\n_( T_OPS_END, \"\")\n";
        match scan_ast_tokens("t.h", text, &plus_minus()).unwrap_err() {
            XrefError::Mismatch { unknown, missing, .. } => {
                assert_eq!(unknown, ["TPercent"]);
                assert_eq!(missing, ["TMinus"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_token() {
        let text = "#define TOKENS(_) \\\n_( T_OPS_START, \"\")\n_( TPlus, \"+\")\n_( TPlus, \"+\")\n_( T_OPS_END, \"\")\n";
        let err = scan_ast_tokens("t.h", text, &plus_minus()).unwrap_err();
        assert!(matches!(err, XrefError::Duplicate { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.h");
        std::fs::write(&path, TOKEN_H).unwrap();
        let tokens = load_ast_tokens(&path, &AstOpTable::builtin()).unwrap();
        assert_eq!(tokens.len(), 14);
    }
}
