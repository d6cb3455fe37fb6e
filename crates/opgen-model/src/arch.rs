//! Model builder: expression tree → [`ArchDef`].
//!
//! A spec file holds architecture attribute assignments and exactly one
//! `(ops ...)` block:
//!
//! ```text
//! (addrSize 8)
//! (ops
//!   ; constants
//!   (ConstI32 () -> i32 Constant (aux i32)) ; sign-extended
//!   (AddI32 (i32 i32) -> i32 Commutative)
//! )
//! ```

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use opgen_sexpr::{read_document, CommentKind, Expr};

use crate::error::{ModelError, Result};
use crate::op::OpDef;
use crate::tables::FlagVocabulary;

const ARCH_ATTRIBUTES: &[&str] = &["name", "addrSize", "regSize", "intSize"];

/// An architecture: parameters plus operators in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchDef {
    /// Spec file the model was read from (as given by the caller).
    pub source_path: PathBuf,
    pub name: String,
    pub addr_size: i64,
    pub reg_size: i64,
    pub int_size: i64,
    /// Operators in declaration order. The order is load-bearing: it fixes
    /// enum values and breaks ties in table construction.
    pub ops: Vec<OpDef>,
    /// Leading comments after the last operator of the block.
    pub tail_comments: Vec<String>,
}

impl ArchDef {
    fn empty(source_path: PathBuf) -> Self {
        ArchDef {
            source_path,
            name: "_".to_string(),
            addr_size: 0,
            reg_size: 0,
            int_size: 0,
            ops: Vec::new(),
            tail_comments: Vec::new(),
        }
    }

    /// Read and build a spec file.
    pub fn load(path: &Path, flags: &FlagVocabulary) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(path, &text, flags)
    }

    /// Build from spec text. `source_path` is recorded for provenance only.
    pub fn parse(source_path: impl Into<PathBuf>, text: &str, flags: &FlagVocabulary) -> Result<Self> {
        let forms = read_document(text)?;
        Self::from_forms(source_path.into(), &forms, flags)
    }

    /// Build from already-read top-level forms.
    pub fn from_forms(source_path: PathBuf, forms: &[Expr], flags: &FlagVocabulary) -> Result<Self> {
        flags.validate()?;
        let mut arch = ArchDef::empty(source_path);
        let mut seen_ops = false;

        for form in forms {
            let Some(items) = form.as_list() else {
                return Err(ModelError::UnexpectedForm {
                    form: form.to_string(),
                });
            };
            if form.as_comment().is_some() {
                continue;
            }
            let Some(key) = form.head_symbol() else {
                return Err(ModelError::UnexpectedForm {
                    form: form.to_string(),
                });
            };

            if key == "ops" {
                if seen_ops {
                    return Err(ModelError::DuplicateOpsBlock);
                }
                seen_ops = true;
                arch.read_ops(&items[1..], flags)?;
            } else if ARCH_ATTRIBUTES.contains(&key) {
                if items.len() != 2 {
                    return Err(ModelError::InvalidArchAttribute {
                        name: key.to_string(),
                        detail: format!("expected exactly one value, got {}", items.len() - 1),
                    });
                }
                arch.set_attribute(key, &items[1])?;
            } else {
                return Err(ModelError::UnknownArchAttribute {
                    name: key.to_string(),
                    expected: ARCH_ATTRIBUTES
                        .iter()
                        .chain(std::iter::once(&"ops"))
                        .map(|s| s.to_string())
                        .collect(),
                });
            }
        }

        if !seen_ops {
            return Err(ModelError::MissingOpsBlock);
        }
        arch.check_unique_names()?;
        arch.constant_ops()?;
        tracing::debug!(
            arch = %arch.name,
            ops = arch.ops.len(),
            addr_size = arch.addr_size,
            reg_size = arch.reg_size,
            int_size = arch.int_size,
            "built arch model"
        );
        Ok(arch)
    }

    fn set_attribute(&mut self, key: &str, value: &Expr) -> Result<()> {
        let int = || {
            value.as_int().ok_or_else(|| ModelError::InvalidArchAttribute {
                name: key.to_string(),
                detail: format!("expected an integer, got {value}"),
            })
        };
        match key {
            "name" => {
                self.name = value
                    .as_symbol()
                    .ok_or_else(|| ModelError::InvalidArchAttribute {
                        name: key.to_string(),
                        detail: format!("expected a symbol, got {value}"),
                    })?
                    .to_string();
            }
            "addrSize" => self.addr_size = int()?,
            "regSize" => self.reg_size = int()?,
            "intSize" => self.int_size = int()?,
            _ => unreachable!("checked against ARCH_ATTRIBUTES"),
        }
        Ok(())
    }

    /// Walk the entries of the ops block, threading comments onto definitions.
    fn read_ops(&mut self, entries: &[Expr], flags: &FlagVocabulary) -> Result<()> {
        let mut pre: Vec<String> = Vec::new();
        let mut post: Vec<String> = Vec::new();

        for entry in entries {
            let Some(items) = entry.as_list() else {
                return Err(ModelError::UnexpectedForm {
                    form: format!("{entry} in ops block"),
                });
            };

            match entry.as_comment() {
                Some((CommentKind::Leading, text)) => {
                    pre.push(text);
                    continue;
                }
                // No definition yet to trail; it reads as part of what follows.
                Some((CommentKind::Trailing, text)) if self.ops.is_empty() => {
                    pre.push(text);
                    continue;
                }
                Some((CommentKind::Trailing, text)) => {
                    post.push(text);
                    continue;
                }
                None => {}
            }

            self.flush_post(&mut post);
            let op = OpDef::parse(items, std::mem::take(&mut pre), flags)?;
            self.ops.push(op);
        }

        self.flush_post(&mut post);
        self.tail_comments.append(&mut pre);
        Ok(())
    }

    fn flush_post(&mut self, post: &mut Vec<String>) {
        if post.is_empty() {
            return;
        }
        if let Some(last) = self.ops.last_mut() {
            last.post_comments.append(post);
        }
    }

    fn check_unique_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for op in &self.ops {
            if !seen.insert(op.name.as_str()) {
                return Err(ModelError::DuplicateOp {
                    name: op.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Constant operators keyed by output tag.
    ///
    /// Fails if a constant operator has other than one output or two claim the
    /// same output tag.
    pub fn constant_ops(&self) -> Result<BTreeMap<&str, &OpDef>> {
        let mut map: BTreeMap<&str, &OpDef> = BTreeMap::new();
        for op in self.ops.iter().filter(|op| op.is_constant()) {
            let tag = op.output.single().ok_or_else(|| ModelError::ConstantArity {
                op: op.name.clone(),
                arity: op.output.arity(),
            })?;
            if let Some(existing) = map.insert(tag, op) {
                return Err(ModelError::DuplicateConstant {
                    op: op.name.clone(),
                    tag: tag.to_string(),
                    existing: existing.name.clone(),
                });
            }
        }
        Ok(map)
    }

    pub fn op(&self, name: &str) -> Option<&OpDef> {
        self.ops.iter().find(|op| op.name == name)
    }
}
