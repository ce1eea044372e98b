//! Reader for the byte field diagram description language.
//!
//! The description language is a small s-expression notation: atoms
//! (numbers, strings, `:keywords`, symbols, `nil`), lists, vectors, maps,
//! and `#{...}` sets, with `;` line comments. This crate lexes and reads
//! source text into [`Form`] trees; evaluation lives in the engine crate.
//!
//! # Example
//!
//! ```
//! let forms = bytefield_parser::read("(draw-box :span 4)").unwrap();
//! assert_eq!(forms.len(), 1);
//! ```

pub mod error;
pub mod form;
pub mod lexer;
pub mod reader;
pub mod span;
pub mod tokens;


pub use form::{Form, FormKind};
pub use span::Span;

use error::ParseError;
use log::debug;

/// Read a source string into top-level forms.
///
/// # Errors
///
/// Returns a [`ParseError`] wrapping lexer (`E0xx`) or reader (`E1xx`)
/// diagnostics with spans into the source.
pub fn read(source: &str) -> Result<Vec<Form>, ParseError> {
    let tokens = lexer::tokenize(source).map_err(ParseError::from)?;
    debug!(token_count = tokens.len(); "Tokenized source");

    let forms = reader::read_program(&tokens).map_err(ParseError::from)?;
    debug!(form_count = forms.len(); "Read program");

    Ok(forms)
}
