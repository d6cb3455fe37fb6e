//! The expression tree produced by the reader.

use std::fmt;

use crate::comment::{decode_comment, CommentKind};

/// An atom or an ordered list of expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Symbol(String),
    Int(i64),
    Float(f64),
    List(Vec<Expr>),
}

impl Expr {
    /// Classify a token: integer, else float, else symbol.
    pub fn atom(token: &str) -> Expr {
        if let Ok(n) = token.parse::<i64>() {
            return Expr::Int(n);
        }
        if let Ok(f) = token.parse::<f64>() {
            return Expr::Float(f);
        }
        Expr::Symbol(token.to_string())
    }

    /// Convenience constructor for a symbol.
    pub fn symbol(name: impl Into<String>) -> Expr {
        Expr::Symbol(name.into())
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Expr::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Expr]> {
        match self {
            Expr::List(items) => Some(items),
            _ => None,
        }
    }

    /// The symbol at the head of a non-empty list.
    pub fn head_symbol(&self) -> Option<&str> {
        self.as_list()
            .and_then(|items| items.first())
            .and_then(Expr::as_symbol)
    }

    /// If this is a materialized comment, its kind and decoded text.
    ///
    /// `(;)` carries empty text. A marker followed by more than one atom is
    /// not a comment.
    pub fn as_comment(&self) -> Option<(CommentKind, String)> {
        let (marker, text) = match self.as_list()? {
            [marker] => (marker, String::new()),
            [marker, text] => (marker, decode_comment(&text.to_string())),
            _ => return None,
        };
        let kind = CommentKind::from_marker(marker.as_symbol()?)?;
        Some((kind, text))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Symbol(s) => write!(f, "{s}"),
            Expr::Int(n) => write!(f, "{n}"),
            Expr::Float(x) => write!(f, "{x:?}"),
            Expr::List(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_classification_order() {
        assert_eq!(Expr::atom("42"), Expr::Int(42));
        assert_eq!(Expr::atom("-7"), Expr::Int(-7));
        assert_eq!(Expr::atom("1.5"), Expr::Float(1.5));
        assert_eq!(Expr::atom("1e3"), Expr::Float(1000.0));
        assert_eq!(Expr::atom("i32"), Expr::symbol("i32"));
        assert_eq!(Expr::atom("->"), Expr::symbol("->"));
    }

    #[test]
    fn display_nested_list() {
        let e = Expr::List(vec![
            Expr::symbol("AddI32"),
            Expr::List(vec![Expr::symbol("i32"), Expr::symbol("i32")]),
            Expr::symbol("->"),
            Expr::Int(8),
            Expr::Float(2.0),
        ]);
        assert_eq!(e.to_string(), "(AddI32 (i32 i32) -> 8 2.0)");
    }

    #[test]
    fn head_symbol() {
        let e = Expr::List(vec![Expr::symbol("ops")]);
        assert_eq!(e.head_symbol(), Some("ops"));
        assert_eq!(Expr::List(vec![]).head_symbol(), None);
        assert_eq!(Expr::symbol("ops").head_symbol(), None);
    }

    #[test]
    fn comment_accessor() {
        let e = Expr::List(vec![Expr::symbol(";;"), Expr::symbol("\u{1}hi\u{1}(x)")]);
        assert_eq!(
            e.as_comment(),
            Some((CommentKind::Trailing, " hi (x)".to_string()))
        );
        let empty = Expr::List(vec![Expr::symbol(";")]);
        assert_eq!(empty.as_comment(), Some((CommentKind::Leading, String::new())));
        assert_eq!(Expr::List(vec![Expr::symbol("ops")]).as_comment(), None);
        let split = Expr::List(vec![Expr::symbol(";"), Expr::symbol("a"), Expr::symbol("b")]);
        assert_eq!(split.as_comment(), None);
    }
}
