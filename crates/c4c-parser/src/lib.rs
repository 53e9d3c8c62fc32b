//! # c4c Parser
//!
//! Front end of the c4c architecture language: a lexer, cursors over the
//! lexed tokens, and a recursive-descent parser that builds a
//! [`Workspace`] tree, expanding `#include` pragmas as it goes.
//!
//! Sources are reached through a [`Provider`], so the same pipeline runs
//! over files, memory or anything else a [`SourceLoader`] can read.
//!
//! ## Usage
//!
//! ```
//! # use c4c_parser::{parse, CachingProvider, MemoryLoader, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let loader = MemoryLoader::default()
//!         .with_source(
//!             "main.c4",
//!             "workspace 'Shop' {\n  model {\n    #include 'people.c4'\n  }\n}\n",
//!         )
//!         .with_source("people.c4", "user = person 'User'\n");
//!     let mut provider = CachingProvider::new(loader);
//!
//!     let workspace = parse("main.c4", &mut provider)?;
//!     assert!(workspace.find(&"user".parse().unwrap()).is_some());
//!     Ok(())
//! }
//! ```

pub mod error;
mod keyword;
mod lexer;
mod parser;
#[cfg(test)]
mod parser_tests;
mod provider;
mod strings;
mod token;
mod token_stream;

pub use error::ParseError;
pub use keyword::Keyword;
pub use lexer::Lexer;
pub use parser::Parser;
pub use provider::{CachingProvider, MemoryLoader, Provider, SourceLoader};
pub use token::{Token, TokenKind};
pub use token_stream::{LexedSource, TokenStream};

use c4c_core::model::Workspace;

/// Parses `target` as a single workspace.
///
/// Shorthand for [`Parser::run`].
pub fn parse(target: &str, provider: &mut dyn Provider) -> Result<Workspace, ParseError> {
    Parser::run(target, provider)
}

/// Parses every workspace declared in `target`.
///
/// Shorthand for [`Parser::run_all`].
pub fn parse_all(target: &str, provider: &mut dyn Provider) -> Result<Vec<Workspace>, ParseError> {
    Parser::run_all(target, provider)
}
