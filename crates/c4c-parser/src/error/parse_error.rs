use std::io;

use c4c_core::ModelError;
use thiserror::Error;

use crate::{
    error::{Diagnostic, ErrorCode, ExpectationError, LexError},
    token::{Token, TokenKind},
};

/// Gives access to the token a failure was detected at.
///
/// Diagnostic renderers use it to locate the error in the source without
/// matching on every error kind.
pub trait TokenAtError {
    fn token_at_error(&self) -> Option<&Token>;
}

/// A source or token stream could not be produced.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no such source: {0}")]
    NotFound(String),

    #[error("failed to read source {name}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// The single terminal error of a parse.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Expectation(Box<ExpectationError>),

    /// A well-formed construct that is not allowed where it appears.
    #[error("{message}")]
    Semantic {
        message: String,
        token: Option<Token>,
    },

    /// The entity tree rejected an insertion or identifier.
    #[error("{error}")]
    Model { error: ModelError, token: Token },

    #[error("{construct} is not supported")]
    Unsupported { construct: String, token: Token },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("cannot include '{target}'")]
    Include {
        target: String,
        token: Token,
        #[source]
        source: ProviderError,
    },
}

impl From<ExpectationError> for ParseError {
    fn from(err: ExpectationError) -> Self {
        ParseError::Expectation(Box::new(err))
    }
}

impl ParseError {
    pub(crate) fn semantic(message: impl Into<String>, token: &Token) -> Self {
        ParseError::Semantic {
            message: message.into(),
            token: Some(token.clone()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Lex(err) => err.kind().code(),
            ParseError::Expectation(err) if err.got().is(TokenKind::Eof) => ErrorCode::E101,
            ParseError::Expectation(_) => ErrorCode::E100,
            ParseError::Unsupported { .. } => ErrorCode::E102,
            ParseError::Semantic { .. } => ErrorCode::E200,
            ParseError::Model {
                error: ModelError::RedefiningIdentifier(_),
                ..
            } => ErrorCode::E201,
            ParseError::Model { .. } => ErrorCode::E202,
            ParseError::Provider(_) => ErrorCode::E300,
            ParseError::Include { .. } => ErrorCode::E301,
        }
    }

    /// Converts the error into a renderable [`Diagnostic`].
    ///
    /// The primary label, when present, covers the offending token.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let code = self.code();
        let mut diagnostic = Diagnostic::error(self.to_string()).with_code(code);

        if let Some(token) = self.token_at_error() {
            let label = match self {
                ParseError::Include { .. } => "included here",
                _ => code.description(),
            };
            diagnostic = diagnostic.with_label(token.range().clone(), label);
        }

        match self.help() {
            Some(help) => diagnostic.with_help(help),
            None => diagnostic,
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            ParseError::Lex(err) => err.kind().help().map(str::to_string),
            ParseError::Expectation(err)
                if err.got().is(TokenKind::Terminator)
                    && err.expected_kinds().contains(&TokenKind::StartBlock) =>
            {
                Some("a line break ends the statement; open the block on the same line".to_string())
            }
            ParseError::Unsupported { .. } => Some("this construct has no grammar yet".to_string()),
            ParseError::Model {
                error: ModelError::RedefiningIdentifier(_),
                ..
            } => Some("choose a different identifier".to_string()),
            ParseError::Include { source, .. } => Some(source.to_string()),
            _ => None,
        }
    }
}

impl TokenAtError for ParseError {
    fn token_at_error(&self) -> Option<&Token> {
        match self {
            ParseError::Lex(err) => err.token_at_error(),
            ParseError::Expectation(err) => err.token_at_error(),
            ParseError::Semantic { token, .. } => token.as_ref(),
            ParseError::Model { token, .. }
            | ParseError::Unsupported { token, .. }
            | ParseError::Include { token, .. } => Some(token),
            ParseError::Provider(_) => None,
        }
    }
}

impl TokenAtError for LexError {
    fn token_at_error(&self) -> Option<&Token> {
        Some(self.token())
    }
}

impl TokenAtError for ExpectationError {
    fn token_at_error(&self) -> Option<&Token> {
        Some(self.got())
    }
}
