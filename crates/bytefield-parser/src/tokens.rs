//! Token types for the diagram description language.

use std::fmt;

use winnow::stream::Location;

use crate::span::Span;

/// Token types produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Delimiters
    LeftParen,     // (
    RightParen,    // )
    LeftBracket,   // [
    RightBracket,  // ]
    LeftBrace,     // {
    RightBrace,    // }
    HashLeftBrace, // #{

    // Literals
    StringLiteral(String),
    IntLiteral(i64),
    FloatLiteral(f64),
    /// Keyword without its leading colon, e.g. `fill` for `:fill`.
    Keyword(&'src str),
    Symbol(&'src str),

    // Comments
    LineComment(&'src str), // ; comment

    // Whitespace
    Whitespace,
    Newline,
}

/// A token with position information for winnow integration
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl<'src> AsRef<Token<'src>> for PositionedToken<'src> {
    fn as_ref(&self) -> &Token<'src> {
        &self.token
    }
}

impl<'src> From<(Token<'src>, Span)> for PositionedToken<'src> {
    fn from((token, span): (Token<'src>, Span)) -> Self {
        Self::new(token, span)
    }
}

impl<'src> fmt::Display for PositionedToken<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl<'src> Location for PositionedToken<'src> {
    fn previous_token_end(&self) -> usize {
        self.span.start()
    }

    fn current_token_start(&self) -> usize {
        self.span.start()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::HashLeftBrace => write!(f, "#{{"),

            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::IntLiteral(n) => write!(f, "{n}"),
            Token::FloatLiteral(n) => write!(f, "{n}"),
            Token::Keyword(name) => write!(f, ":{name}"),
            Token::Symbol(name) => write!(f, "{name}"),

            Token::LineComment(text) => write!(f, ";{text}"),

            Token::Whitespace => write!(f, " "),
            Token::Newline => writeln!(f),
        }
    }
}
