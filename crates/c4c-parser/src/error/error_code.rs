//! Stable error codes.
//!
//! Codes are grouped by the phase that raises them:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Grammar errors
//! - `E2xx` - Semantic errors
//! - `E3xx` - Source provider errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// A character that cannot start any token.
    E001,

    /// An identifier ending in `.`, `-` or `_`.
    E002,

    /// A string literal still open at the end of the file.
    E003,

    /// A raw line break inside a `'` or `"` string.
    ///
    /// Only backtick strings may span lines.
    E004,

    /// A `/*` comment with no closing `*/`.
    E005,

    // =========================================================================
    // Grammar Errors (E1xx)
    // =========================================================================
    /// The parser required a different token at this position.
    E100,

    /// The input ended before the construct was complete.
    E101,

    /// The construct is recognized but has no grammar, e.g. `views`.
    E102,

    // =========================================================================
    // Semantic Errors (E2xx)
    // =========================================================================
    /// The construct is well formed but not allowed here: a repeated
    /// `description` in one block, mixed tag separators, an include cycle.
    E200,

    /// Two entities in one scope share an identifier.
    E201,

    /// An identifier that breaks the identifier rules.
    E202,

    // =========================================================================
    // Provider Errors (E3xx)
    // =========================================================================
    /// The entry source could not be loaded.
    E300,

    /// An `#include` target could not be loaded.
    E301,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "illegal identifier suffix",
            ErrorCode::E003 => "unterminated string literal",
            ErrorCode::E004 => "newline in string literal",
            ErrorCode::E005 => "unterminated block comment",
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "unexpected end of input",
            ErrorCode::E102 => "unsupported construct",
            ErrorCode::E200 => "invalid declaration",
            ErrorCode::E201 => "duplicate identifier",
            ErrorCode::E202 => "invalid identifier",
            ErrorCode::E300 => "source unavailable",
            ErrorCode::E301 => "include target unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
