//! Typed operator model for opgen.
//!
//! Turns the expression tree of a spec file into an [`ArchDef`]: architecture
//! parameters plus the ordered list of operator definitions. The configuration
//! tables that give the model its vocabulary (operator flags, type codes and
//! their representation tags, source-operator prefixes) live in [`tables`]
//! and are passed in explicitly so tests can substitute their own.
//!
//! ## Modules
//!
//! - [`tables`] — flag vocabulary, type-code table, AST operator table
//! - [`op`] — operator definitions and signatures
//! - [`arch`] — the model builder

pub mod arch;
pub mod error;
pub mod op;
pub mod tables;

pub use arch::ArchDef;
pub use error::{ModelError, Result};
pub use op::{OpDef, Signature, CONSTANT_FLAG};
pub use tables::{AstOpTable, FlagDef, FlagVocabulary, OpPrefixes, Tables, TypeCodeTable, MAX_FLAGS};
