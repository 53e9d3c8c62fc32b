use std::fmt;

use crate::{
    keyword::Keyword,
    token::{Token, TokenKind},
};

/// The parser needed one of a set of tokens or keywords and got something else.
///
/// Built with [`ExpectationError::new`] and the `tokens`/`keywords`/`message`
/// builders:
///
/// ```
/// # use c4c_core::position::{Position, PositionRange};
/// # use c4c_parser::{Token, TokenKind, Keyword, error::ExpectationError};
/// let at = Position::new("main.c4", 1, 0, 0);
/// let token = Token::new(TokenKind::StartBlock, PositionRange::new(at.clone(), at));
/// let err = ExpectationError::new(token, None)
///     .tokens([TokenKind::String, TokenKind::Terminator])
///     .keywords([Keyword::Model]);
/// assert_eq!(
///     err.to_string(),
///     "got '{' but expected token types String, or Newline or terminator (';'), or keyword 'model'",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectationError {
    got: Token,
    got_keyword: Option<Keyword>,
    token_kinds: Vec<TokenKind>,
    keywords: Vec<Keyword>,
    message: String,
}

impl ExpectationError {
    pub fn new(got: Token, got_keyword: Option<Keyword>) -> Self {
        Self {
            got,
            got_keyword,
            token_kinds: Vec::new(),
            keywords: Vec::new(),
            message: String::new(),
        }
    }

    pub fn tokens(mut self, kinds: impl IntoIterator<Item = TokenKind>) -> Self {
        self.token_kinds.extend(kinds);
        self
    }

    pub fn keywords(mut self, keywords: impl IntoIterator<Item = Keyword>) -> Self {
        self.keywords.extend(keywords);
        self
    }

    /// Appends free text after the expected set, e.g. `" in model block"`.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn got(&self) -> &Token {
        &self.got
    }

    pub fn got_keyword(&self) -> Option<Keyword> {
        self.got_keyword
    }

    pub fn expected_kinds(&self) -> &[TokenKind] {
        &self.token_kinds
    }

    pub fn expected_keywords(&self) -> &[Keyword] {
        &self.keywords
    }
}

/// Writes `a`, `a, or b`, `a, b, or c`.
fn write_alternatives<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    write_item: impl Fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
            if i == items.len() - 1 {
                f.write_str("or ")?;
            }
        }
        write_item(f, item)?;
    }
    Ok(())
}

fn plural(count: usize) -> &'static str {
    if count > 1 { "s" } else { "" }
}

impl fmt::Display for ExpectationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.got_keyword {
            Some(keyword) => write!(f, "got keyword '{keyword}' but expected ")?,
            None => write!(f, "got {} but expected ", self.got.kind())?,
        }

        if !self.token_kinds.is_empty() {
            write!(f, "token type{} ", plural(self.token_kinds.len()))?;
            write_alternatives(f, &self.token_kinds, |f, kind| write!(f, "{kind}"))?;
            if !self.keywords.is_empty() {
                f.write_str(", or ")?;
            }
        }

        if !self.keywords.is_empty() {
            write!(f, "keyword{} ", plural(self.keywords.len()))?;
            write_alternatives(f, &self.keywords, |f, keyword| write!(f, "'{keyword}'"))?;
        }

        f.write_str(&self.message)
    }
}

impl std::error::Error for ExpectationError {}

#[cfg(test)]
mod tests {
    use c4c_core::position::{Position, PositionRange};

    use super::*;

    fn token(kind: TokenKind) -> Token {
        let at = Position::new("main.c4", 2, 4, 10);
        Token::new(kind, PositionRange::new(at.clone(), at))
    }

    #[test]
    fn test_single_token_kind() {
        let err = ExpectationError::new(token(TokenKind::Eof), None).tokens([TokenKind::String]);
        assert_eq!(err.to_string(), "got End of File but expected token type String");
    }

    #[test]
    fn test_keyword_got() {
        let err = ExpectationError::new(token(TokenKind::Keyword), Some(Keyword::Views))
            .keywords([Keyword::Person, Keyword::SoftwareSystem, Keyword::Group])
            .message(" in model block");
        assert_eq!(
            err.to_string(),
            "got keyword 'views' but expected keywords 'person', 'softwaresystem', or 'group' in model block"
        );
    }

    #[test]
    fn test_accessors() {
        let err = ExpectationError::new(token(TokenKind::Directive), None)
            .tokens([TokenKind::Identifier])
            .keywords([Keyword::This]);
        assert!(err.got().is(TokenKind::Directive));
        assert_eq!(err.got_keyword(), None);
        assert_eq!(err.expected_kinds(), &[TokenKind::Identifier]);
        assert_eq!(err.expected_keywords(), &[Keyword::This]);
    }
}
