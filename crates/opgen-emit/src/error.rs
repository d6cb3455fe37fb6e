//! Generator error types.

/// Errors raised while generating output blocks.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    #[error("no constant op for TypeCode {type_code} (tried: {})", tags.join(", "))]
    MissingConstant {
        type_code: String,
        tags: Vec<String>,
    },

    #[error("unknown type code {type_code:?}; it is not in the type-code table")]
    UnknownTypeCode { type_code: String },

    #[error(transparent)]
    Model(#[from] opgen_model::ModelError),
}

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, EmitError>;
