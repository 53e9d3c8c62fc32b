//! Error types for c4c operations.
//!
//! [`C4cError`] wraps every failure of a compilation, from reading the
//! entry file to serializing the result.

use std::{io, path::PathBuf};

use thiserror::Error;

use c4c_parser::ParseError;

/// The main error type for c4c operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the text of the file the error was found
/// in, so a renderer can show the offending span even when it lies inside
/// an included file.
#[derive(Debug, Error)]
pub enum C4cError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse {
        err: ParseError,
        /// Name of the source the error points into.
        file: String,
        src: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Source root {} is not a directory", .0.display())]
    SourceRoot(PathBuf),

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),
}

impl C4cError {
    /// Create a new `Parse` error with the source it points into.
    pub fn new_parse_error(
        err: ParseError,
        file: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self::Parse {
            err,
            file: file.into(),
            src: src.into(),
        }
    }
}
