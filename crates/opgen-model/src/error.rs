//! Model builder error types.

/// Errors raised while building the operator model or its tables.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The operator file is not well-formed.
    #[error("syntax error: {0}")]
    Read(#[from] opgen_sexpr::ReadError),

    /// I/O error reading the operator file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected form {form}")]
    UnexpectedForm { form: String },

    #[error("unexpected arch attribute {name:?}; expected one of: {}", expected.join(", "))]
    UnknownArchAttribute {
        name: String,
        expected: Vec<String>,
    },

    #[error("invalid value for arch attribute {name}: {detail}")]
    InvalidArchAttribute { name: String, detail: String },

    #[error("no (ops ...) block")]
    MissingOpsBlock,

    #[error("more than one (ops ...) block")]
    DuplicateOpsBlock,

    #[error("malformed op {form}: {detail}")]
    MalformedOp { form: String, detail: String },

    #[error("missing '->' in op {form}")]
    MissingArrow { form: String },

    #[error("invalid {role} signature in op {op}: {detail}")]
    InvalidSignature {
        op: String,
        role: &'static str,
        detail: String,
    },

    #[error("unexpected attribute {flag:?} in op {op}; expected one of: {}", expected.join(", "))]
    UnknownFlag {
        op: String,
        flag: String,
        expected: Vec<String>,
    },

    #[error("unexpected attribute {key:?} in op {op}; expected one of: {}", expected.join(", "))]
    UnknownKey {
        op: String,
        key: String,
        expected: Vec<String>,
    },

    #[error("invalid attribute {attr} in op {op}: {detail}")]
    InvalidAttribute {
        op: String,
        attr: String,
        detail: String,
    },

    #[error("duplicate op {name:?}")]
    DuplicateOp { name: String },

    #[error("too many op flags to work as bitflags: {count} (max {max})")]
    TooManyFlags { count: usize, max: usize },

    #[error("duplicate op flag {name:?}")]
    DuplicateFlag { name: String },

    #[error("constant op {op:?} produces {arity} outputs; should produce one")]
    ConstantArity { op: String, arity: usize },

    #[error("duplicate constant op {op:?} for type {tag:?} (already provided by {existing:?})")]
    DuplicateConstant {
        op: String,
        tag: String,
        existing: String,
    },

    #[error("invalid table: {detail}")]
    InvalidTable { detail: String },
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_flag_lists_vocabulary() {
        let err = ModelError::UnknownFlag {
            op: "AddI32".into(),
            flag: "Commutativ".into(),
            expected: vec!["Commutative".into(), "Constant".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("AddI32"));
        assert!(msg.contains("Commutative, Constant"));
    }

    #[test]
    fn read_error_converts() {
        let err: ModelError = opgen_sexpr::ReadError::UnexpectedEof.into();
        assert!(err.to_string().starts_with("syntax error"));
    }
}
