//! Token types produced by the lexer.

use std::fmt;

use c4c_core::position::PositionRange;

use crate::error::LexErrorKind;

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    String,
    Identifier,
    /// `=`
    Assignment,
    /// `{`
    StartBlock,
    /// `}`
    EndBlock,
    /// `!`
    Directive,
    /// A newline ending a statement, or `;`
    Terminator,
    /// `->`
    Relationship,
    /// `#name`, e.g. `#include`
    Pragma,
    Eof,
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Keyword => "Keyword",
            TokenKind::String => "String",
            TokenKind::Identifier => "Identifier",
            TokenKind::Assignment => "'='",
            TokenKind::StartBlock => "'{'",
            TokenKind::EndBlock => "'}'",
            TokenKind::Directive => "'!'",
            TokenKind::Terminator => "Newline or terminator (';')",
            TokenKind::Relationship => "\"->\"",
            TokenKind::Pragma => "Pragma",
            TokenKind::Eof => "End of File",
            TokenKind::Error => "Error",
        };
        f.write_str(text)
    }
}

/// A lexed token and the source range it covers.
///
/// Tokens are immutable once the lexer emits them. Tokens of kind
/// [`TokenKind::Error`] carry the reason lexing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    range: PositionRange,
    error: Option<LexErrorKind>,
}

impl Token {
    pub fn new(kind: TokenKind, range: PositionRange) -> Self {
        Self {
            kind,
            range,
            error: None,
        }
    }

    pub(crate) fn error(range: PositionRange, error: LexErrorKind) -> Self {
        Self {
            kind: TokenKind::Error,
            range,
            error: Some(error),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn range(&self) -> &PositionRange {
        &self.range
    }

    /// The lex failure of an [`TokenKind::Error`] token.
    pub fn lex_error(&self) -> Option<&LexErrorKind> {
        self.error.as_ref()
    }

    /// The text of `source` this token covers.
    ///
    /// `source` must be the text of the file named by the token's range.
    /// Returns an empty string if it is not.
    pub fn bytes_at<'a>(&self, source: &'a str) -> &'a str {
        self.range.slice(source).unwrap_or_default()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "Error({err}) at {}", self.range),
            None => write!(f, "{} at {}", self.kind, self.range),
        }
    }
}
