//! Lexed token buffers and cursors over them.

use std::sync::Arc;

use crate::{
    error::LexError,
    token::{Token, TokenKind},
};

/// The immutable result of lexing one file.
///
/// Cloning is cheap: the token buffer is shared. Every call to
/// [`LexedSource::token_stream`] returns an independent cursor, so the same
/// file can be walked by several streams at once.
#[derive(Debug, Clone)]
pub struct LexedSource {
    name: Arc<str>,
    tokens: Arc<[Token]>,
}

impl LexedSource {
    /// `tokens` must end with an [`TokenKind::Eof`] token.
    pub(crate) fn new(name: Arc<str>, tokens: Vec<Token>) -> Self {
        debug_assert!(
            tokens.last().is_some_and(|t| t.is(TokenKind::Eof)),
            "lexed source must end with EOF"
        );
        Self {
            name,
            tokens: tokens.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The first Error token, as a [`LexError`].
    pub fn first_error(&self) -> Option<LexError> {
        self.tokens.iter().find_map(LexError::from_token)
    }

    pub fn has_errors(&self) -> bool {
        self.tokens.iter().any(|t| t.is(TokenKind::Error))
    }

    /// A fresh cursor positioned before the first token.
    pub fn token_stream(&self) -> TokenStream {
        TokenStream {
            name: Arc::clone(&self.name),
            tokens: Arc::clone(&self.tokens),
            cursor: 0,
            can_backup: false,
        }
    }
}

/// A cursor over a [`LexedSource`] with one step of backup.
///
/// Once the final EOF token is reached, [`TokenStream::next_token`] keeps
/// returning it.
///
/// # Examples
///
/// ```
/// use c4c_parser::{Lexer, TokenKind};
///
/// let lexed = Lexer::new("main.c4", "a -> b").run().unwrap();
/// let mut stream = lexed.token_stream();
///
/// let first = stream.next_token();
/// stream.backup_token();
/// assert_eq!(stream.next_token(), first);
/// assert!(stream.next_token().is(TokenKind::Relationship));
/// ```
#[derive(Debug, Clone)]
pub struct TokenStream {
    name: Arc<str>,
    tokens: Arc<[Token]>,
    /// Index of the token the next call returns.
    cursor: usize,
    can_backup: bool,
}

impl TokenStream {
    /// Name of the file this stream reads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Advances and returns the token under the cursor.
    pub fn next_token(&mut self) -> Token {
        let index = self.cursor.min(self.tokens.len().saturating_sub(1));
        self.cursor = index + 1;
        self.can_backup = true;
        self.tokens[index].clone()
    }

    /// Steps back over the token last returned by [`TokenStream::next_token`].
    ///
    /// # Panics
    ///
    /// Panics if called twice without an intervening `next_token`, or
    /// before the first one.
    pub fn backup_token(&mut self) {
        assert!(self.can_backup, "attempt to double backup tokens");
        self.can_backup = false;
        self.cursor -= 1;
    }

    /// Whether the cursor has passed the EOF token.
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn stream(source: &str) -> TokenStream {
        Lexer::new("main.c4", source).lex().token_stream()
    }

    #[test]
    fn test_next_and_backup() {
        let mut stream = stream("a = b");
        assert!(stream.next_token().is(TokenKind::Identifier));
        let assignment = stream.next_token();
        assert!(assignment.is(TokenKind::Assignment));

        stream.backup_token();
        assert_eq!(stream.next_token(), assignment);
    }

    #[test]
    #[should_panic(expected = "attempt to double backup tokens")]
    fn test_double_backup_panics() {
        let mut stream = stream("a b");
        stream.next_token();
        stream.next_token();
        stream.backup_token();
        stream.backup_token();
    }

    #[test]
    #[should_panic(expected = "attempt to double backup tokens")]
    fn test_backup_before_next_panics() {
        stream("a").backup_token();
    }

    #[test]
    fn test_eof_repeats() {
        let mut stream = stream("a");
        stream.next_token();
        stream.next_token();
        assert!(stream.next_token().is(TokenKind::Eof));
        assert!(stream.is_exhausted());
        assert!(stream.next_token().is(TokenKind::Eof));

        stream.backup_token();
        assert!(stream.next_token().is(TokenKind::Eof));
    }

    #[test]
    fn test_streams_are_independent() {
        let lexed = Lexer::new("main.c4", "a b c").lex();
        let mut first = lexed.token_stream();
        let mut second = lexed.token_stream();

        first.next_token();
        first.next_token();
        let from_second = second.next_token();
        assert_eq!(from_second.bytes_at("a b c"), "a");
        assert_eq!(first.next_token().bytes_at("a b c"), "c");
        assert_eq!(second.name(), "main.c4");
    }

    #[test]
    fn test_first_error() {
        let lexed = Lexer::new("main.c4", "a % b").lex();
        assert!(lexed.has_errors());
        let err = lexed.first_error().unwrap();
        assert_eq!(err.token().bytes_at("a % b"), "%");

        let clean = Lexer::new("main.c4", "a b").lex();
        assert!(!clean.has_errors());
        assert!(clean.first_error().is_none());
    }
}
