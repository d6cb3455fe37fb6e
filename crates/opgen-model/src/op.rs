//! Operator definitions.
//!
//! An operator definition looks like
//!
//! ```text
//! (Name  INPUT  ->  OUTPUT  ATTRIBUTES...)
//! (AddI16   (i16 i16) -> i16  Commutative  ResultInArg0)
//! (ConstI32 ()        -> i32  Constant  (aux i32))
//! ```

use std::collections::BTreeMap;
use std::fmt;

use opgen_sexpr::Expr;

use crate::error::{ModelError, Result};
use crate::tables::FlagVocabulary;

/// Flag that marks an operator as materializing a constant of its output type.
pub const CONSTANT_FLAG: &str = "Constant";

/// Attributes that carry a value, e.g. `(aux i32)`.
pub const KEY_ATTRIBUTES: &[&str] = &["aux"];

/// Input or output type signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// A bare tag, e.g. `i32`.
    Single(String),
    /// A parenthesized list of tags, e.g. `(i32 i32)` or `()`.
    List(Vec<String>),
}

impl Signature {
    fn from_expr(expr: &Expr, op: &str, role: &'static str) -> Result<Self> {
        let invalid = |detail: String| ModelError::InvalidSignature {
            op: op.to_string(),
            role,
            detail,
        };
        match expr {
            Expr::Symbol(tag) => Ok(Signature::Single(tag.clone())),
            Expr::List(items) => items
                .iter()
                .map(|item| {
                    item.as_symbol()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(format!("expected a type tag, got {item}")))
                })
                .collect::<Result<Vec<_>>>()
                .map(Signature::List),
            other => Err(invalid(format!("expected a type tag or list, got {other}"))),
        }
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Signature::Single(tag) => std::slice::from_ref(tag),
            Signature::List(tags) => tags,
        }
    }

    pub fn arity(&self) -> usize {
        self.tags().len()
    }

    /// Space-joined tags; used as a lookup key.
    pub fn key(&self) -> String {
        self.tags().join(" ")
    }

    /// The tag of a one-element signature.
    pub fn single(&self) -> Option<&str> {
        match self.tags() {
            [tag] => Some(tag),
            _ => None,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// A named IR operator template.
#[derive(Debug, Clone, PartialEq)]
pub struct OpDef {
    pub name: String,
    pub input: Signature,
    pub output: Signature,
    /// Flags in the order they were written.
    pub flags: Vec<String>,
    /// Key attributes and their value lists.
    pub keys: BTreeMap<String, Vec<Expr>>,
    /// Comments written on their own lines before this definition.
    pub pre_comments: Vec<String>,
    /// Comments written after this definition on the same line.
    pub post_comments: Vec<String>,
}

impl OpDef {
    /// Parse one definition list. `pre_comments` are the leading comments
    /// collected since the previous definition.
    pub fn parse(
        items: &[Expr],
        pre_comments: Vec<String>,
        flags: &FlagVocabulary,
    ) -> Result<Self> {
        let form = || Expr::List(items.to_vec()).to_string();
        if items.iter().any(|item| item.as_comment().is_some()) {
            return Err(ModelError::MalformedOp {
                form: form(),
                detail: "comments are not allowed inside an op definition".into(),
            });
        }
        if items.len() < 4 {
            return Err(ModelError::MalformedOp {
                form: form(),
                detail: format!("expected at least 4 elements, got {}", items.len()),
            });
        }
        let name = items[0].as_symbol().ok_or_else(|| ModelError::MalformedOp {
            form: form(),
            detail: "operation should start with a name".into(),
        })?;
        if items[2].as_symbol() != Some("->") {
            return Err(ModelError::MissingArrow { form: form() });
        }

        let mut op = OpDef {
            name: name.to_string(),
            input: Signature::from_expr(&items[1], name, "input")?,
            output: Signature::from_expr(&items[3], name, "output")?,
            flags: Vec::new(),
            keys: BTreeMap::new(),
            pre_comments,
            post_comments: Vec::new(),
        };
        for attr in &items[4..] {
            op.add_attribute(attr, flags)?;
        }
        Ok(op)
    }

    fn add_attribute(&mut self, attr: &Expr, flags: &FlagVocabulary) -> Result<()> {
        match attr {
            Expr::List(parts) => {
                if parts.len() < 2 {
                    return Err(ModelError::InvalidAttribute {
                        op: self.name.clone(),
                        attr: attr.to_string(),
                        detail: "expected (key value...)".into(),
                    });
                }
                let key = parts[0].to_string();
                if !KEY_ATTRIBUTES.contains(&key.as_str()) {
                    return Err(ModelError::UnknownKey {
                        op: self.name.clone(),
                        key,
                        expected: KEY_ATTRIBUTES.iter().map(|k| k.to_string()).collect(),
                    });
                }
                if self.keys.contains_key(&key) {
                    return Err(ModelError::InvalidAttribute {
                        op: self.name.clone(),
                        attr: attr.to_string(),
                        detail: format!("{key} given more than once"),
                    });
                }
                self.keys.insert(key, parts[1..].to_vec());
            }
            atom => {
                let flag = atom.to_string();
                if !flags.contains(&flag) {
                    return Err(ModelError::UnknownFlag {
                        op: self.name.clone(),
                        flag,
                        expected: flags.sorted_names(),
                    });
                }
                if !self.flags.contains(&flag) {
                    self.flags.push(flag);
                }
            }
        }
        Ok(())
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_constant(&self) -> bool {
        self.has_flag(CONSTANT_FLAG)
    }

    /// Value of the `aux` attribute, if present.
    pub fn aux(&self) -> Option<&[Expr]> {
        self.keys.get("aux").map(Vec::as_slice)
    }
}
