//! Error types for diagram generation.

use bytefield_parser::{Span, error::ParseError};
use thiserror::Error;

/// An error raised while evaluating a diagram script.
///
/// Every variant carries the span of the form that caused it so callers can
/// point back into the source text.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("unbound symbol '{name}'")]
    UnboundSymbol { name: String, span: Span },

    #[error("no attribute set named :{name} is defined")]
    UnboundAttrs { name: String, span: Span },

    #[error("{callee} expects {expected} arguments, got {actual}")]
    ArityMismatch {
        callee: String,
        expected: String,
        actual: usize,
        span: Span,
    },

    #[error("{context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: String,
        actual: String,
        span: Span,
    },

    #[error("malformed {callee} form: {reason}")]
    MalformedForm {
        callee: String,
        reason: String,
        span: Span,
    },

    #[error("unknown option :{name} for {callee}")]
    UnknownOption {
        callee: String,
        name: String,
        span: Span,
    },

    #[error("invalid color: {message}")]
    InvalidColor { message: String, span: Span },

    #[error(
        "box of span {box_span} starting at column {column} overflows a row of {row_width} columns"
    )]
    RowOverflow {
        column: u32,
        box_span: u32,
        row_width: u32,
        span: Span,
    },

    #[error("cannot draw after draw-bottom has closed the diagram")]
    AfterBottom { span: Span },
}

impl EvalError {
    /// The source span of the offending form.
    pub fn span(&self) -> Span {
        match self {
            EvalError::UnboundSymbol { span, .. }
            | EvalError::UnboundAttrs { span, .. }
            | EvalError::ArityMismatch { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::MalformedForm { span, .. }
            | EvalError::UnknownOption { span, .. }
            | EvalError::InvalidColor { span, .. }
            | EvalError::RowOverflow { span, .. }
            | EvalError::AfterBottom { span } => *span,
        }
    }
}

/// Top-level error type for the generation pipeline.
///
/// Parse and evaluation errors keep a copy of the source so reporting
/// front ends can render labeled snippets without replumbing it.
#[derive(Debug, Error)]
pub enum BytefieldError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("{err}")]
    Eval { err: EvalError, src: String },
}

impl BytefieldError {
    pub fn new_parse_error(err: ParseError, src: &str) -> Self {
        Self::Parse {
            err,
            src: src.to_owned(),
        }
    }

    pub fn new_eval_error(err: EvalError, src: &str) -> Self {
        Self::Eval {
            err,
            src: src.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_error_reports_span() {
        let err = EvalError::UnboundSymbol {
            name: String::from("greeen"),
            span: Span::new(10..16),
        };
        assert_eq!(err.span().start(), 10);
        assert_eq!(err.to_string(), "unbound symbol 'greeen'");
    }

    #[test]
    fn test_overflow_message_names_columns() {
        let err = EvalError::RowOverflow {
            column: 14,
            box_span: 4,
            row_width: 16,
            span: Span::default(),
        };
        assert!(err.to_string().contains("column 14"));
        assert!(err.to_string().contains("16 columns"));
    }
}
