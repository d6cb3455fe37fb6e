//! Type-code enumeration loader.
//!
//! Scans a C header for the `TYPE_CODES` X-macro:
//!
//! ```text
//! #define TYPE_CODES(_) \
//!   _( bool    , 'b' ) \
//!   _( int32   , '4' ) \
//!   _( INTRINSIC_NUM_END, 0 ) \
//!   _( int     , 'i' ) \
//!   _( NUM_END , 0 ) \
//! ```
//!
//! Names before `INTRINSIC_NUM_END` are canonical type codes; names after it
//! and before `NUM_END` are aliases.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use opgen_model::TypeCodeTable;
use regex::Regex;

use crate::error::{Result, XrefError};
use crate::{check_set_equal, insert_unique, read_file};

pub const START_MARKER: &str = "#define TYPE_CODES";
pub const ALIAS_MARKER: &str = "INTRINSIC_NUM_END";
pub const END_MARKER: &str = "NUM_END";

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*_\(\s*(\w+)").expect("type-code entry pattern"));

/// Names scanned from the type-code enumeration, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeCodes {
    /// Canonical type codes. Generators iterate these.
    pub codes: Vec<String>,
    pub aliases: Vec<String>,
}

/// Read `path` and scan it with [`scan_type_codes`].
pub fn load_type_codes(path: &Path, table: &TypeCodeTable) -> Result<TypeCodes> {
    let text = read_file(path)?;
    scan_type_codes(&path.display().to_string(), &text, table)
}

/// Scan header text for type codes and check them against `table`.
///
/// `file` only labels errors.
pub fn scan_type_codes(file: &str, text: &str, table: &TypeCodeTable) -> Result<TypeCodes> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|line| line.contains(START_MARKER)) {
        return Err(XrefError::StartNotFound {
            file: file.to_string(),
            marker: START_MARKER.to_string(),
        });
    }

    let mut codes: Vec<&str> = Vec::new();
    let mut aliases: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();
    let mut in_aliases = false;
    let mut ended = false;

    for line in lines {
        let Some(name) = ENTRY_RE
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
        else {
            continue;
        };
        if name == END_MARKER {
            ended = true;
            break;
        }
        if name == ALIAS_MARKER {
            in_aliases = true;
            continue;
        }
        insert_unique(file, &mut seen, name)?;
        if in_aliases {
            aliases.push(name);
        } else {
            codes.push(name);
        }
    }

    if !ended {
        return Err(XrefError::EndNotFound {
            file: file.to_string(),
            marker: END_MARKER.to_string(),
        });
    }
    check_set_equal(file, "type codes", &codes, table.names())?;
    check_set_equal(file, "type code aliases", &aliases, table.alias_names())?;

    tracing::debug!(file, codes = codes.len(), aliases = aliases.len(), "scanned type codes");
    Ok(TypeCodes {
        codes: codes.into_iter().map(str::to_string).collect(),
        aliases: aliases.into_iter().map(str::to_string).collect(),
    })
}
