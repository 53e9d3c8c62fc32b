use thiserror::Error;

use crate::{error::ErrorCode, token::Token};

/// Why the lexer rejected a run of characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character {0:?}")]
    UnexpectedCharacter(char),

    #[error("illegal identifier suffix character '{0}'")]
    IllegalIdentifierSuffix(char),

    #[error("unexpected EOF: expected end of string")]
    UnterminatedString,

    #[error("unexpected newline in string")]
    NewlineInString,

    #[error("unexpected EOF: expected end of block comment")]
    UnterminatedBlockComment,
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::UnexpectedCharacter(_) => ErrorCode::E001,
            LexErrorKind::IllegalIdentifierSuffix(_) => ErrorCode::E002,
            LexErrorKind::UnterminatedString => ErrorCode::E003,
            LexErrorKind::NewlineInString => ErrorCode::E004,
            LexErrorKind::UnterminatedBlockComment => ErrorCode::E005,
        }
    }

    pub(crate) fn help(&self) -> Option<&'static str> {
        match self {
            LexErrorKind::UnexpectedCharacter(_) => {
                Some("identifiers must start with a lower-case letter")
            }
            LexErrorKind::IllegalIdentifierSuffix(_) => {
                Some("identifiers may not end with '.', '-' or '_'")
            }
            LexErrorKind::UnterminatedString => Some("close the string with its opening quote"),
            LexErrorKind::NewlineInString => {
                Some("use a backtick-quoted string for text spanning several lines")
            }
            LexErrorKind::UnterminatedBlockComment => Some("close the comment with '*/'"),
        }
    }
}

/// A lex failure and the Error token that records where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct LexError {
    kind: LexErrorKind,
    token: Token,
}

impl LexError {
    pub fn new(kind: LexErrorKind, token: Token) -> Self {
        Self { kind, token }
    }

    /// Builds the error from an Error token, if `token` is one.
    pub fn from_token(token: &Token) -> Option<Self> {
        let kind = token.lex_error()?.clone();
        Some(Self::new(kind, token.clone()))
    }

    pub fn kind(&self) -> &LexErrorKind {
        &self.kind
    }

    pub fn token(&self) -> &Token {
        &self.token
    }
}
