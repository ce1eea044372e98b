//! Error and diagnostic system for the description-language reader.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, source
//! locations, and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from the reading lifecycle.
//!
//! # Example
//!
//! ```
//! # use bytefield_parser::error::{Diagnostic, ErrorCode};
//! # use bytefield_parser::Span;
//!
//! let span = Span::new(100..120);
//!
//! let diag = Diagnostic::error("unclosed list")
//!     .with_code(ErrorCode::E101)
//!     .with_label(span, "opened here")
//!     .with_help("add a matching ')'");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
