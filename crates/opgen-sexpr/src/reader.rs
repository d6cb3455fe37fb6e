//! Tokenizer and recursive list reader.

use crate::comment::{check_reserved, materialize_comments, CommentKind};
use crate::error::{ReadError, Result};
use crate::expr::Expr;

/// Materialize comments, then split into `(`, `)` and whitespace-separated atoms.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = materialize_comments(text);
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' | ')' => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(c.to_string());
            }
            c if c.is_ascii_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Read every top-level form of a spec file.
///
/// The text behaves as if wrapped in one outer list; an empty document yields
/// an empty vector.
pub fn read_document(text: &str) -> Result<Vec<Expr>> {
    check_reserved(text)?;
    let tokens = tokenize(text);
    let mut reader = TokenReader::new(&tokens);
    let mut forms = Vec::new();
    while !reader.at_end() {
        forms.push(reader.read()?);
    }
    Ok(forms)
}

/// Read exactly one expression.
pub fn read_expr(text: &str) -> Result<Expr> {
    check_reserved(text)?;
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return Err(ReadError::Empty);
    }
    let mut reader = TokenReader::new(&tokens);
    let expr = reader.read()?;
    if let Some(token) = reader.peek() {
        return Err(ReadError::TrailingTokens {
            index: reader.pos,
            token: token.to_string(),
        });
    }
    Ok(expr)
}

struct TokenReader<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> TokenReader<'a> {
    fn new(tokens: &'a [String]) -> Self {
        TokenReader { tokens, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn read(&mut self) -> Result<Expr> {
        let index = self.pos;
        match self.next().ok_or(ReadError::UnexpectedEof)? {
            "(" => self.read_list(),
            ")" => Err(ReadError::UnexpectedClose { index }),
            token => Ok(Expr::atom(token)),
        }
    }

    fn read_list(&mut self) -> Result<Expr> {
        let mut items = Vec::new();

        // Comment text stays a symbol no matter what it looks like.
        if let Some(marker) = self.peek().filter(|t| CommentKind::from_marker(t).is_some()) {
            let index = self.pos;
            self.pos += 1;
            items.push(Expr::symbol(marker));
            loop {
                match self.next().ok_or(ReadError::UnexpectedEof)? {
                    ")" => break,
                    token => items.push(Expr::symbol(token)),
                }
            }
            if items.len() > 2 {
                return Err(ReadError::MalformedComment {
                    index,
                    atoms: items.len() - 1,
                });
            }
            return Ok(Expr::List(items));
        }

        loop {
            match self.peek() {
                None => return Err(ReadError::UnexpectedEof),
                Some(")") => {
                    self.pos += 1;
                    return Ok(Expr::List(items));
                }
                Some(_) => items.push(self.read()?),
            }
        }
    }
}
