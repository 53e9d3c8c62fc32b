//! Error adapter for converting C4cError to miette diagnostics.
//!
//! This module bridges the library's error types and miette's rich
//! diagnostic formatting used in the CLI.
//!
//! # Source Files
//!
//! A parse error may point into an included file rather than the entry
//! file. The error carries the name and text of that file, and only labels
//! that lie inside it are rendered.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, NamedSource, SourceSpan};

use c4c::{C4cError, position::PositionRange};
use c4c_parser::error::{Diagnostic, Severity};

/// Adapter for a single c4c diagnostic.
///
/// Wraps a [`Diagnostic`] together with the source it points into and
/// implements [`MietteDiagnostic`] to enable rich error formatting.
pub struct DiagnosticAdapter {
    /// The wrapped diagnostic
    diag: Diagnostic,
    /// Name of the file the labels point into
    file: String,
    /// Source code for displaying snippets
    source: NamedSource<String>,
}

impl DiagnosticAdapter {
    /// Create a new diagnostic adapter.
    pub fn new(diag: Diagnostic, file: impl Into<String>, src: impl Into<String>) -> Self {
        let file = file.into();
        Self {
            diag,
            source: NamedSource::new(&file, src.into()),
            file,
        }
    }
}

impl fmt::Debug for DiagnosticAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .field("file", &self.file)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter {}

impl MietteDiagnostic for DiagnosticAdapter {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            Severity::Error => miette::Severity::Error,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let mut labels = self
            .diag
            .labels()
            .iter()
            .filter(|label| label.range().file() == self.file)
            .peekable();
        labels.peek()?;

        Some(Box::new(labels.map(|label| {
            let span = range_to_miette(label.range());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`C4cError`] variants.
///
/// Handles errors without source locations, such as I/O, configuration and
/// export errors.
pub struct ErrorAdapter<'a>(pub &'a C4cError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            C4cError::Io(_) => "c4c::io",
            C4cError::Parse { .. } => return None,
            C4cError::Config(_) | C4cError::SourceRoot(_) => "c4c::config",
            C4cError::Export(_) => "c4c::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// Wraps either a diagnostic with source locations or a plain error, so
/// both render through one interface.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => std::error::Error::source(e),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`PositionRange`] to a miette [`SourceSpan`].
fn range_to_miette(range: &PositionRange) -> SourceSpan {
    SourceSpan::new(range.start().byte_offset().into(), range.len())
}

/// Convert a [`C4cError`] into a list of reportable errors.
///
/// Parsing stops at the first error, so every variant yields exactly one
/// [`Reportable`].
pub fn to_reportables(err: &C4cError) -> Vec<Reportable<'_>> {
    match err {
        C4cError::Parse {
            err: parse_err,
            file,
            src,
        } => vec![Reportable::Diagnostic(DiagnosticAdapter::new(
            parse_err.to_diagnostic(),
            file.as_str(),
            src.as_str(),
        ))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
