//! Comment materialization.
//!
//! A comment that is the only content of its line is *leading* and becomes
//! `(; text)`. A comment after other content is *trailing* and becomes
//! `(;; text)`. The text may contain the delimiters of the outer syntax, so it
//! is escaped into a single token first: each delimiter maps to a control byte
//! that is rejected anywhere in real input (see [`check_reserved`]).

use crate::error::{ReadError, Result};

/// Delimiter → placeholder pairs: every byte the tokenizer splits on except
/// `\n`, which ends the comment. Placeholders are C0 control bytes that never
/// occur in spec text.
const ESCAPES: [(char, char); 6] = [
    (' ', '\u{1}'),
    ('\t', '\u{2}'),
    ('\u{c}', '\u{3}'),
    ('(', '\u{4}'),
    (')', '\u{5}'),
    ('\r', '\u{6}'),
];

/// Head symbol of a materialized comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// Comment alone on its line.
    Leading,
    /// Comment following code on the same line.
    Trailing,
}

impl CommentKind {
    /// The marker symbol used as the head of the synthetic sub-form.
    pub fn marker(self) -> &'static str {
        match self {
            CommentKind::Leading => ";",
            CommentKind::Trailing => ";;",
        }
    }

    /// Recognize a marker token.
    pub fn from_marker(token: &str) -> Option<Self> {
        match token {
            ";" => Some(CommentKind::Leading),
            ";;" => Some(CommentKind::Trailing),
            _ => None,
        }
    }
}

/// Whether `c` is one of the placeholder bytes.
pub fn is_reserved(c: char) -> bool {
    ESCAPES.iter().any(|&(_, placeholder)| placeholder == c)
}

/// Escape comment text so it survives tokenization as one atom.
pub fn encode_comment(text: &str) -> String {
    text.chars()
        .map(|c| {
            ESCAPES
                .iter()
                .find(|&&(delim, _)| delim == c)
                .map_or(c, |&(_, placeholder)| placeholder)
        })
        .collect()
}

/// Inverse of [`encode_comment`].
pub fn decode_comment(text: &str) -> String {
    text.chars()
        .map(|c| {
            ESCAPES
                .iter()
                .find(|&&(_, placeholder)| placeholder == c)
                .map_or(c, |&(delim, _)| delim)
        })
        .collect()
}

/// Fail if `text` contains a placeholder byte anywhere.
pub fn check_reserved(text: &str) -> Result<()> {
    for (idx, line) in text.split('\n').enumerate() {
        if let Some(c) = line.chars().find(|&c| is_reserved(c)) {
            return Err(ReadError::ReservedByte {
                line: idx + 1,
                byte: c as u32,
            });
        }
    }
    Ok(())
}

/// Rewrite every comment in `text` into its synthetic sub-form.
///
/// The comment starts at the first `;` of a line; the whole run of `;` is the
/// comment opener and is not part of the text.
pub fn materialize_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for line in text.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        let Some(pos) = body.find(';') else {
            out.push_str(line);
            continue;
        };
        let (code, rest) = body.split_at(pos);
        let comment = rest.trim_start_matches(';');
        let comment = comment.strip_suffix('\r').unwrap_or(comment);
        let kind = if code.trim().is_empty() {
            CommentKind::Leading
        } else {
            CommentKind::Trailing
        };

        out.push_str(code);
        out.push('(');
        out.push_str(kind.marker());
        out.push(' ');
        out.push_str(&encode_comment(comment));
        out.push(')');
        out.push_str(newline);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encode_replaces_delimiters() {
        let encoded = encode_comment(" arg0 + (arg1)");
        assert!(!encoded.contains(' '));
        assert!(!encoded.contains('('));
        assert!(!encoded.contains(')'));
        assert_eq!(decode_comment(&encoded), " arg0 + (arg1)");
    }

    #[test]
    fn leading_comment() {
        let out = materialize_comments("  ; hello world\n(x)\n");
        assert_eq!(out, "  (; \u{1}hello\u{1}world)\n(x)\n");
    }

    #[test]
    fn trailing_comment() {
        let out = materialize_comments("(Phi) ; select (arg)\n");
        assert_eq!(out, "(Phi) (;; \u{1}select\u{1}\u{4}arg\u{5})\n");
    }

    #[test]
    fn semicolon_run_is_one_opener() {
        let out = materialize_comments(";;; banner ; inner\n");
        assert_eq!(out, "(; \u{1}banner\u{1};\u{1}inner)\n");
    }

    #[test]
    fn empty_comment() {
        assert_eq!(materialize_comments(";\n"), "(; )\n");
    }

    #[test]
    fn crlf_is_not_comment_text() {
        assert_eq!(materialize_comments("; x\r\n"), "(; \u{1}x)\n");
    }

    #[test]
    fn inner_carriage_return_is_escaped() {
        assert_eq!(
            materialize_comments("(a) ; left\rright\r\n"),
            "(a) (;; \u{1}left\u{6}right)\n"
        );
    }

    #[test]
    fn last_line_without_newline() {
        assert_eq!(materialize_comments("(a) ; end"), "(a) (;; \u{1}end)");
    }

    #[test]
    fn lines_without_comments_untouched() {
        let src = "(ops\n  (AddI32 (i32 i32) -> i32)\n)\n";
        assert_eq!(materialize_comments(src), src);
    }

    #[test]
    fn reserved_byte_rejected_with_line() {
        let err = check_reserved("(a)\n(b \u{4})\n").unwrap_err();
        assert_eq!(err, ReadError::ReservedByte { line: 2, byte: 4 });
    }

    #[test]
    fn carriage_return_placeholder_reserved() {
        let err = check_reserved("(a)\n\n; \u{6}\n").unwrap_err();
        assert_eq!(err, ReadError::ReservedByte { line: 3, byte: 6 });
    }

    #[test]
    fn marker_round_trip() {
        for kind in [CommentKind::Leading, CommentKind::Trailing] {
            assert_eq!(CommentKind::from_marker(kind.marker()), Some(kind));
        }
        assert_eq!(CommentKind::from_marker(";;;"), None);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(s in "[^\\x01-\\x06]{0,64}") {
            prop_assert_eq!(decode_comment(&encode_comment(&s)), s);
        }

        #[test]
        fn encoded_text_is_one_token(s in "[^\\x01-\\x06\\n]{0,64}") {
            let encoded = encode_comment(&s);
            prop_assert!(!encoded.contains(|c: char| c == '(' || c == ')' || c.is_ascii_whitespace()));
        }
    }
}
