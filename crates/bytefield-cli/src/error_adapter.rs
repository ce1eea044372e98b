//! Error adapter for converting [`BytefieldError`] to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`bytefield_parser::error::ParseError`] contains multiple
//! diagnostics, each diagnostic is rendered independently. Evaluation
//! errors carry a single span and render as one labeled report.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use bytefield::{BytefieldError, EvalError};
use bytefield_parser::error::Diagnostic;

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for evaluation errors, which carry one span into the script.
pub struct EvalAdapter<'a> {
    err: &'a EvalError,
    src: &'a str,
}

impl<'a> EvalAdapter<'a> {
    pub fn new(err: &'a EvalError, src: &'a str) -> Self {
        Self { err, src }
    }
}

impl fmt::Debug for EvalAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.err, f)
    }
}

impl fmt::Display for EvalAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl std::error::Error for EvalAdapter<'_> {}

impl MietteDiagnostic for EvalAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("bytefield::eval"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = span_to_miette(self.err.span());
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(String::from("in this form")), span),
        )))
    }
}

/// Adapter for [`BytefieldError`] variants without source context.
pub struct ErrorAdapter<'a>(pub &'a BytefieldError);

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
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            BytefieldError::Io(_) => Some(Box::new("bytefield::io")),
            BytefieldError::Parse { .. } | BytefieldError::Eval { .. } => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich parser diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An evaluation error with a single source span.
    Eval(EvalAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Eval(e) => fmt::Display::fmt(e, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) | Reportable::Eval(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Eval(e) => e.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Eval(e) => e.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Eval(e) => e.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Eval(e) => e.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a [`bytefield_parser::Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: bytefield_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`BytefieldError`] into a list of reportable errors.
///
/// For [`BytefieldError::Parse`], this returns one [`Reportable`] per
/// diagnostic in the error. Other variants yield a single [`Reportable`].
pub fn to_reportables(err: &BytefieldError) -> Vec<Reportable<'_>> {
    match err {
        BytefieldError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        BytefieldError::Eval { err: eval_err, src } => {
            vec![Reportable::Eval(EvalAdapter::new(eval_err, src))]
        }
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_yields_one_reportable_per_diagnostic() {
        let source = "(draw-box";
        let err = bytefield::generate(source, &bytefield::Options::default()).unwrap_err();
        let reportables = to_reportables(&err);
        assert!(!reportables.is_empty());
        assert!(matches!(reportables[0], Reportable::Diagnostic(_)));
        assert!(reportables[0].source_code().is_some());
    }

    #[test]
    fn test_eval_error_carries_span_label() {
        let source = "(draw-box :fill greeen)";
        let err = bytefield::generate(source, &bytefield::Options::default()).unwrap_err();
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert!(matches!(reportables[0], Reportable::Eval(_)));
        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn test_io_error_has_code_and_no_source() {
        let err = BytefieldError::Io(std::io::Error::other("disk on fire"));
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert!(reportables[0].code().is_some());
        assert!(reportables[0].source_code().is_none());
    }
}
