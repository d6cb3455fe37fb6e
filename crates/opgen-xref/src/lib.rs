//! Cross-reference validators.
//!
//! The operator generator keeps its own copies of two enumerations that are
//! authoritatively defined elsewhere in the compiler: the scalar type codes
//! (`types.h`) and the source-operator tokens (`token.h`). The loaders here
//! scan those files, return the canonical ordered name lists, and fail when
//! the declared tables and the scanned names are not the same set.

pub mod error;
pub mod tokens;
pub mod type_codes;

use std::collections::HashSet;
use std::path::Path;

pub use error::{Result, XrefError};
pub use tokens::{load_ast_tokens, scan_ast_tokens, AstToken};
pub use type_codes::{load_type_codes, scan_type_codes, TypeCodes};

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| XrefError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Fail unless `scanned` and `declared` hold the same names.
fn check_set_equal<'a>(
    file: &str,
    what: &'static str,
    scanned: &[&'a str],
    declared: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    let declared: Vec<&str> = declared.into_iter().collect();
    let declared_set: HashSet<&str> = declared.iter().copied().collect();
    let scanned_set: HashSet<&str> = scanned.iter().copied().collect();

    let unknown: Vec<String> = scanned
        .iter()
        .filter(|n| !declared_set.contains(*n))
        .map(|n| n.to_string())
        .collect();
    let missing: Vec<String> = declared
        .iter()
        .filter(|n| !scanned_set.contains(*n))
        .map(|n| n.to_string())
        .collect();

    if unknown.is_empty() && missing.is_empty() {
        return Ok(());
    }
    Err(XrefError::Mismatch {
        file: file.to_string(),
        what,
        unknown,
        missing,
    })
}

/// Record `name`, failing if it was already seen.
fn insert_unique<'a>(file: &str, seen: &mut HashSet<&'a str>, name: &'a str) -> Result<()> {
    if !seen.insert(name) {
        return Err(XrefError::Duplicate {
            file: file.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_sets_in_any_order() {
        check_set_equal("f", "names", &["b", "a"], ["a", "b"]).unwrap();
    }

    #[test]
    fn mismatch_keeps_source_order() {
        let err = check_set_equal("f", "names", &["z", "a", "y"], ["a", "b", "c"]).unwrap_err();
        match err {
            XrefError::Mismatch { unknown, missing, .. } => {
                assert_eq!(unknown, ["z", "y"]);
                assert_eq!(missing, ["b", "c"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_detected() {
        let mut seen = HashSet::new();
        insert_unique("f", &mut seen, "a").unwrap();
        let err = insert_unique("f", &mut seen, "a").unwrap_err();
        assert!(matches!(err, XrefError::Duplicate { name, .. } if name == "a"));
    }
}
