//! Error codes for the reader diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Reader errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that is not valid in this context.
    E002,

    /// Invalid escape sequence.
    ///
    /// An unrecognized escape sequence was used in a string literal.
    /// Valid escapes are: `\n`, `\r`, `\t`, `\\`, `\"`.
    E003,

    /// Invalid number literal.
    ///
    /// A number literal could not be parsed, for example a radix prefix
    /// with no digits (`0x`) or digits outside the radix.
    E004,

    /// Empty keyword.
    ///
    /// A `:` was found with no name following it.
    E005,

    // =========================================================================
    // Reader Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The reader encountered a token it did not expect at this position.
    E100,

    /// Unclosed delimiter.
    ///
    /// A list, vector, map, or set was opened but never closed.
    E101,

    /// Unmatched closing delimiter.
    ///
    /// A closing delimiter was found with no matching opener.
    E102,

    /// Malformed map literal.
    ///
    /// A map literal must contain an even number of forms (key-value pairs).
    E103,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
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
            ErrorCode::E103 => "E103",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
