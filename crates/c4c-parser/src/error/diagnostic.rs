//! The renderable form of an error.

use std::fmt;

use c4c_core::position::PositionRange;

use crate::error::{ErrorCode, Label, Severity};

/// A diagnostic message with source locations.
///
/// Rendering is left to the caller. A diagnostic carries everything needed
/// to show a code snippet: the file, line, column and length of every
/// labeled range.
///
/// ```text
/// error[E201]: redefining identifier api
///   --> main.c4:4:9
///    |
///  4 |         api = container "Other"
///    |         ^^^ duplicate identifier
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use c4c_core::position::{Position, PositionRange};
    /// # use c4c_parser::error::{Diagnostic, ErrorCode};
    /// let range = PositionRange::new(
    ///     Position::new("main.c4", 1, 0, 0),
    ///     Position::new("main.c4", 1, 5, 5),
    /// );
    /// let diag = Diagnostic::error("got '{' but expected String")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(range, "unexpected token")
    ///     .with_help("add a name for the person");
    /// assert_eq!(diag.to_string(), "error[E100]: got '{' but expected String");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// The first primary label, which names the file the diagnostic is about.
    pub fn primary_label(&self) -> Option<&Label> {
        self.labels.iter().find(|label| label.is_primary())
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, range: PositionRange, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(range, message));
        self
    }

    pub fn with_secondary_label(
        mut self,
        range: PositionRange,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::secondary(range, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
