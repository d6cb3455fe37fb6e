//! Reader for the parenthesized-list language used by operator spec files.
//!
//! The language is deliberately tiny: every expression is an atom (integer,
//! float or symbol) or a list of expressions. What sets this reader apart from
//! a textbook S-expression reader is that comments are kept as data. Before
//! tokenizing, every `;` comment is rewritten into a synthetic sub-form so it
//! shows up in the tree as an ordinary sibling of the code around it:
//!
//! ```text
//! ; leading comment          =>  (; leading comment)
//! (AddI32 ...) ; trailing    =>  (AddI32 ...) (;; trailing)
//! ```
//!
//! ## Modules
//!
//! - [`comment`] — comment materialization and the reversible text escape
//! - [`expr`] — the expression tree
//! - [`reader`] — tokenizer and recursive list reader

pub mod comment;
pub mod error;
pub mod expr;
pub mod reader;

pub use comment::{decode_comment, encode_comment, CommentKind};
pub use error::{ReadError, Result};
pub use expr::Expr;
pub use reader::{read_document, read_expr, tokenize};
