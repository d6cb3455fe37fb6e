//! Reader error types.

/// Syntax errors produced while reading spec text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadError {
    /// The input contains one of the control bytes reserved for comment escaping.
    #[error("line {line}: input contains reserved byte {byte:#04x}")]
    ReservedByte { line: usize, byte: u32 },

    /// Input ended inside a list, or where an expression was expected.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A `)` with no matching `(`.
    #[error("unexpected ')' at token {index}")]
    UnexpectedClose { index: usize },

    /// More tokens followed a complete expression.
    #[error("unexpected {token:?} at token {index} after a complete expression")]
    TrailingTokens { index: usize, token: String },

    /// A comment form split into more than one text atom.
    #[error("comment at token {index} has {atoms} text atoms; expected at most one")]
    MalformedComment { index: usize, atoms: usize },

    /// Nothing to read.
    #[error("empty input")]
    Empty,
}

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, ReadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ReadError::UnexpectedClose { index: 3 };
        assert_eq!(err.to_string(), "unexpected ')' at token 3");

        let err = ReadError::ReservedByte { line: 2, byte: 1 };
        assert!(err.to_string().contains("0x01"));
    }
}
