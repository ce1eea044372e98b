//! The Diagnostic type: one error or warning with source context.

use std::fmt;

use crate::{
    error::{ErrorCode, Label, Severity},
    span::Span,
};

/// A single diagnostic message with optional code, labels, and help text.
///
/// Built with a fluent API:
///
/// ```
/// # use bytefield_parser::error::{Diagnostic, ErrorCode};
/// # use bytefield_parser::Span;
/// let diag = Diagnostic::error("unexpected token")
///     .with_code(ErrorCode::E100)
///     .with_label(Span::new(10..14), "found here")
///     .with_help("check for a missing delimiter");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    message: String,
    code: Option<ErrorCode>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error-severity diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            code: None,
            labels: Vec::new(),
            help: None,
        }
    }

    /// Create a warning-severity diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            code: None,
            labels: Vec::new(),
            help: None,
        }
    }

    /// Attach an error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a primary label pointing at the offending span.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Attach a secondary label with supporting context.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Attach help text suggesting a fix.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The primary label's span, if any label was attached.
    pub fn primary_span(&self) -> Option<Span> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .or_else(|| self.labels.first())
            .map(|label| label.span())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{}]: {}", self.severity, code, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_code() {
        let diag = Diagnostic::error("unexpected token").with_code(ErrorCode::E100);
        assert_eq!(diag.to_string(), "error[E100]: unexpected token");
    }

    #[test]
    fn test_display_without_code() {
        let diag = Diagnostic::error("unexpected token");
        assert_eq!(diag.to_string(), "error: unexpected token");
    }

    #[test]
    fn test_primary_span_prefers_primary_label() {
        let diag = Diagnostic::error("unclosed list")
            .with_secondary_label(Span::new(0..1), "opened here")
            .with_label(Span::new(10..11), "expected ')' here");
        assert_eq!(diag.primary_span(), Some(Span::new(10..11)));
    }
}
