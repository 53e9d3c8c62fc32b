//! Errors and diagnostics for lexing, parsing and source loading.
//!
//! Parsing is fail-fast: [`Parser::run`](crate::Parser::run) returns the
//! first [`ParseError`] it hits. Every error kind can name the token it
//! failed at through [`TokenAtError`], and can be turned into a
//! [`Diagnostic`] for rendering.
//!
//! # Example
//!
//! ```
//! # use c4c_parser::{MemoryLoader, CachingProvider, Parser};
//! # use c4c_parser::error::{ErrorCode, TokenAtError};
//! let source = "workspace {\n  model {\n    api = person 'A'\n    api = person 'B'\n  }\n}";
//! let mut provider =
//!     CachingProvider::new(MemoryLoader::default().with_source("main.c4", source));
//! let err = Parser::run("main.c4", &mut provider).unwrap_err();
//!
//! let diagnostic = err.to_diagnostic();
//! assert_eq!(diagnostic.code(), Some(ErrorCode::E201));
//! assert!(err.token_at_error().is_some());
//! ```

mod diagnostic;
mod error_code;
mod expectation;
mod label;
mod lex_error;
mod parse_error;
mod severity;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use expectation::ExpectationError;
pub use label::Label;
pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::{ParseError, ProviderError, TokenAtError};
pub use severity::Severity;

/// A type alias for `Result<T, ParseError>`.
pub type Result<T> = std::result::Result<T, ParseError>;
