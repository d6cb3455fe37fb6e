//! Configuration tables.
//!
//! These are the hand-maintained mappings that tie the operator spec to the
//! rest of the compiler. They are plain values: build them once (usually with
//! [`Tables::builtin`]) and pass them to the loaders and generators.

use std::collections::HashSet;

use crate::error::{ModelError, Result};

/// Flags are emitted as a C bitfield with one bit per flag, starting at bit 0.
pub const MAX_FLAGS: usize = 31;

/// An operator flag and its one-line description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagDef {
    pub name: String,
    pub doc: String,
}

/// Ordered set of operator flags. Order fixes bit positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagVocabulary {
    flags: Vec<FlagDef>,
}

const BUILTIN_FLAGS: &[(&str, &str)] = &[
    ("ZeroWidth", "dummy op; no actual I/O."),
    ("Constant", "true if the value is a constant. Value in aux"),
    ("Commutative", "commutative on its first 2 arguments (e.g. addition; x+y==y+x)"),
    ("ResultInArg0", "output of v and v.args[0] must be allocated to the same register."),
    ("ResultNotInArgs", "outputs must not be allocated to the same registers as inputs"),
    ("Rematerializeable", "register allocator can recompute value instead of spilling/restoring."),
    ("ClobberFlags", "this op clobbers flags register"),
    ("Call", "is a function call"),
    ("NilCheck", "this op is a nil check on arg0"),
    ("FaultOnNilArg0", "this op will fault if arg0 is nil (and aux encodes a small offset)"),
    ("FaultOnNilArg1", "this op will fault if arg1 is nil (and aux encodes a small offset)"),
    ("UsesScratch", "this op requires scratch memory space"),
    ("HasSideEffects", "for \"reasons\", not to be eliminated.  E.g., atomic store."),
    ("Generic", "generic op"),
];

impl FlagVocabulary {
    /// Build a vocabulary, rejecting duplicates and more than [`MAX_FLAGS`] entries.
    pub fn new<I, N, D>(flags: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, D)>,
        N: Into<String>,
        D: Into<String>,
    {
        let flags: Vec<FlagDef> = flags
            .into_iter()
            .map(|(name, doc)| FlagDef {
                name: name.into(),
                doc: doc.into(),
            })
            .collect();
        let vocab = FlagVocabulary { flags };
        vocab.validate()?;
        Ok(vocab)
    }

    /// The vocabulary the IR is built with.
    pub fn builtin() -> Self {
        FlagVocabulary {
            flags: BUILTIN_FLAGS
                .iter()
                .map(|&(name, doc)| FlagDef {
                    name: name.to_string(),
                    doc: doc.to_string(),
                })
                .collect(),
        }
    }

    /// Check the bitfield invariants. Generators call this again before emitting.
    pub fn validate(&self) -> Result<()> {
        if self.flags.len() > MAX_FLAGS {
            return Err(ModelError::TooManyFlags {
                count: self.flags.len(),
                max: MAX_FLAGS,
            });
        }
        let mut seen = HashSet::new();
        for flag in &self.flags {
            if !seen.insert(flag.name.as_str()) {
                return Err(ModelError::DuplicateFlag {
                    name: flag.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name == name)
    }

    /// Bit position of a flag.
    pub fn bit(&self, name: &str) -> Option<u32> {
        self.flags
            .iter()
            .position(|f| f.name == name)
            .map(|i| i as u32)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlagDef> {
        self.flags.iter()
    }

    /// Flag names, sorted, for error messages.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.flags.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// A type code and its representation tags, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCodeEntry {
    pub name: String,
    pub tags: Vec<String>,
}

/// Type code → representation tags, plus short aliases.
///
/// Tag order is a preference order: when several tags of a type code could
/// match, the first one that matches wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCodeTable {
    entries: Vec<TypeCodeEntry>,
    aliases: Vec<(String, String)>,
}

const BUILTIN_TYPE_CODES: &[(&str, &[&str])] = &[
    ("bool", &["bool"]),
    ("int8", &["s8", "i8"]),
    ("uint8", &["u8", "i8"]),
    ("int16", &["s16", "i16"]),
    ("uint16", &["u16", "i16"]),
    ("int32", &["s32", "i32"]),
    ("uint32", &["u32", "i32"]),
    ("int64", &["s64", "i64"]),
    ("uint64", &["u64", "i64"]),
    ("float32", &["f32"]),
    ("float64", &["f64"]),
];

const BUILTIN_ALIASES: &[(&str, &str)] = &[("int", "int32"), ("uint", "uint32")];

impl TypeCodeTable {
    /// Build a table. Every type code needs at least one tag, names are unique
    /// and every alias must point at a declared type code.
    pub fn new<I, N, T, S>(entries: I, aliases: &[(&str, &str)]) -> Result<Self>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<TypeCodeEntry> = entries
            .into_iter()
            .map(|(name, tags)| TypeCodeEntry {
                name: name.into(),
                tags: tags.into_iter().map(Into::into).collect(),
            })
            .collect();

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.tags.is_empty() {
                return Err(ModelError::InvalidTable {
                    detail: format!("type code {:?} has no representation tags", entry.name),
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ModelError::InvalidTable {
                    detail: format!("duplicate type code {:?}", entry.name),
                });
            }
        }
        for &(alias, target) in aliases {
            if !seen.contains(target) {
                return Err(ModelError::InvalidTable {
                    detail: format!("alias {alias:?} targets unknown type code {target:?}"),
                });
            }
        }

        Ok(TypeCodeTable {
            entries,
            aliases: aliases
                .iter()
                .map(|&(a, t)| (a.to_string(), t.to_string()))
                .collect(),
        })
    }

    pub fn builtin() -> Self {
        TypeCodeTable {
            entries: BUILTIN_TYPE_CODES
                .iter()
                .map(|&(name, tags)| TypeCodeEntry {
                    name: name.to_string(),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                })
                .collect(),
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|&(a, t)| (a.to_string(), t.to_string()))
                .collect(),
        }
    }

    /// Representation tags of a type code, most specific first.
    pub fn tags(&self, code: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.name == code)
            .map(|e| e.tags.as_slice())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.tags(code).is_some()
    }

    pub fn contains_alias(&self, alias: &str) -> bool {
        self.aliases.iter().any(|(a, _)| a == alias)
    }

    /// Declared type-code names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn alias_names(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(|(a, _)| a.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// IR operator name prefixes a source token lowers to, by operand count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpPrefixes {
    pub unary: Option<String>,
    pub binary: Option<String>,
}

impl OpPrefixes {
    pub fn new(unary: Option<&str>, binary: Option<&str>) -> Self {
        OpPrefixes {
            unary: unary.map(str::to_string),
            binary: binary.map(str::to_string),
        }
    }

    /// The prefix that applies to an operator with `arity` inputs.
    pub fn for_arity(&self, arity: usize) -> Option<&str> {
        match arity {
            1 => self.unary.as_deref(),
            2 => self.binary.as_deref(),
            _ => None,
        }
    }
}

/// Source-operator token → IR operator prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstOpTable {
    entries: Vec<(String, OpPrefixes)>,
}

const BUILTIN_AST_OPS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("TPlus", None, Some("Add")),
    ("TMinus", Some("Neg"), Some("Sub")),
    ("TStar", None, Some("Mul")),
    ("TSlash", None, Some("Div")),
    ("TGt", None, Some("Greater")),
    ("TLt", None, Some("Less")),
    ("TEqEq", None, Some("Eq")),
    ("TNEq", None, Some("NEq")),
    ("TLEq", None, Some("LEq")),
    ("TGEq", None, Some("GEq")),
    ("TPlusPlus", None, None),
    ("TMinusMinus", None, None),
    ("TTilde", None, None),
    ("TBang", Some("Not"), None),
];

impl AstOpTable {
    /// Build a table; token names must be unique.
    pub fn new<I, N>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, OpPrefixes)>,
        N: Into<String>,
    {
        let entries: Vec<(String, OpPrefixes)> =
            entries.into_iter().map(|(n, p)| (n.into(), p)).collect();
        let mut seen = HashSet::new();
        for (name, _) in &entries {
            if !seen.insert(name.as_str()) {
                return Err(ModelError::InvalidTable {
                    detail: format!("duplicate AST operator token {name:?}"),
                });
            }
        }
        Ok(AstOpTable { entries })
    }

    pub fn builtin() -> Self {
        AstOpTable {
            entries: BUILTIN_AST_OPS
                .iter()
                .map(|&(tok, unary, binary)| (tok.to_string(), OpPrefixes::new(unary, binary)))
                .collect(),
        }
    }

    pub fn get(&self, token: &str) -> Option<&OpPrefixes> {
        self.entries
            .iter()
            .find(|(name, _)| name == token)
            .map(|(_, p)| p)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All configuration tables, bundled for passing around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub flags: FlagVocabulary,
    pub type_codes: TypeCodeTable,
    pub ast_ops: AstOpTable,
}

impl Tables {
    pub fn builtin() -> Self {
        Tables {
            flags: FlagVocabulary::builtin(),
            type_codes: TypeCodeTable::builtin(),
            ast_ops: AstOpTable::builtin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_flags_pass_validation() {
        let builtin = FlagVocabulary::builtin();
        builtin.validate().unwrap();
        let rebuilt =
            FlagVocabulary::new(builtin.iter().map(|f| (f.name.clone(), f.doc.clone()))).unwrap();
        assert_eq!(rebuilt, builtin);
        assert_eq!(builtin.bit("ZeroWidth"), Some(0));
        assert_eq!(builtin.bit("Constant"), Some(1));
        assert_eq!(builtin.bit("Nope"), None);
    }

    #[test]
    fn thirty_one_flags_allowed() {
        let flags = (0..31).map(|i| (format!("F{i}"), String::new()));
        assert_eq!(FlagVocabulary::new(flags).unwrap().len(), 31);
    }

    #[test]
    fn thirty_second_flag_rejected() {
        let flags = (0..32).map(|i| (format!("F{i}"), String::new()));
        let err = FlagVocabulary::new(flags).unwrap_err();
        assert!(matches!(err, ModelError::TooManyFlags { count: 32, max: 31 }));
    }

    #[test]
    fn duplicate_flag_rejected() {
        let err = FlagVocabulary::new([("A", ""), ("B", ""), ("A", "")]).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateFlag { name } if name == "A"));
    }

    #[test]
    fn type_code_tags_in_preference_order() {
        let table = TypeCodeTable::builtin();
        assert_eq!(table.tags("int32").unwrap(), ["s32", "i32"]);
        assert_eq!(table.tags("float64").unwrap(), ["f64"]);
        assert!(table.tags("str").is_none());
        assert!(table.contains_alias("int"));
        assert_eq!(table.names().next(), Some("bool"));
    }

    #[test]
    fn type_code_table_rejects_empty_tags() {
        let err = TypeCodeTable::new([("int32", Vec::<&str>::new())], &[]).unwrap_err();
        assert!(err.to_string().contains("no representation tags"));
    }

    #[test]
    fn type_code_table_rejects_dangling_alias() {
        let err = TypeCodeTable::new([("int32", ["s32", "i32"])], &[("uint", "uint32")]).unwrap_err();
        assert!(err.to_string().contains("uint32"));
    }

    #[test]
    fn prefixes_by_arity() {
        let table = AstOpTable::builtin();
        let minus = table.get("TMinus").unwrap();
        assert_eq!(minus.for_arity(1), Some("Neg"));
        assert_eq!(minus.for_arity(2), Some("Sub"));
        assert_eq!(minus.for_arity(3), None);
        assert_eq!(table.get("TTilde").unwrap(), &OpPrefixes::default());
    }

    #[test]
    fn ast_table_rejects_duplicates() {
        let err = AstOpTable::new([
            ("TPlus", OpPrefixes::new(None, Some("Add"))),
            ("TPlus", OpPrefixes::default()),
        ])
        .unwrap_err();
        assert!(matches!(err, ModelError::InvalidTable { .. }));
    }
}
