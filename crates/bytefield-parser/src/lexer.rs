//! Hand-written lexer for the diagram description language.
//!
//! Produces [`PositionedToken`]s for the reader. Whitespace, commas, and
//! line comments are tokenized (not skipped) so the reader controls what is
//! insignificant; commas count as whitespace as in the source notation.

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Characters that may appear in a symbol after the first character.
fn is_symbol_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '-' | '*' | '/' | '_' | '!' | '?' | '<' | '>' | '=' | '.')
}

/// Characters that may start a symbol.
fn is_symbol_start(c: char) -> bool {
    is_symbol_char(c) && !c.is_ascii_digit()
}

/// Tokenize a source string into positioned tokens.
///
/// Fails with a lexer diagnostic (`E0xx`) on the first invalid character,
/// unterminated string, bad escape, or malformed number.
pub fn tokenize(source: &str) -> Result<Vec<PositionedToken<'_>>, Diagnostic> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            '(' => push_single(&mut tokens, &mut chars, Token::LeftParen),
            ')' => push_single(&mut tokens, &mut chars, Token::RightParen),
            '[' => push_single(&mut tokens, &mut chars, Token::LeftBracket),
            ']' => push_single(&mut tokens, &mut chars, Token::RightBracket),
            '{' => push_single(&mut tokens, &mut chars, Token::LeftBrace),
            '}' => push_single(&mut tokens, &mut chars, Token::RightBrace),
            '#' => {
                chars.next();
                match chars.peek() {
                    Some(&(_, '{')) => {
                        chars.next();
                        tokens.push(PositionedToken::new(
                            Token::HashLeftBrace,
                            Span::new(start..start + 2),
                        ));
                    }
                    _ => {
                        return Err(Diagnostic::error("unexpected character '#'")
                            .with_code(ErrorCode::E002)
                            .with_label(Span::new(start..start + 1), "found here")
                            .with_help("'#' only introduces set literals: #{...}"));
                    }
                }
            }
            '\n' => push_single(&mut tokens, &mut chars, Token::Newline),
            c if c == ',' || (c.is_whitespace() && c != '\n') => {
                let mut end = start;
                while let Some(&(i, c)) = chars.peek() {
                    if c == ',' || (c.is_whitespace() && c != '\n') {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(PositionedToken::new(Token::Whitespace, Span::new(start..end)));
            }
            ';' => {
                let mut end = source.len();
                chars.next();
                for (i, c) in chars.by_ref() {
                    if c == '\n' {
                        end = i;
                        break;
                    }
                    end = i + c.len_utf8();
                }
                tokens.push(PositionedToken::new(
                    Token::LineComment(&source[start + 1..end]),
                    Span::new(start..end),
                ));
                // Re-emit the newline the comment loop consumed, if any.
                if end < source.len() {
                    tokens.push(PositionedToken::new(Token::Newline, Span::new(end..end + 1)));
                }
            }
            '"' => {
                let (token, span) = lex_string(source, start, &mut chars)?;
                tokens.push(PositionedToken::new(token, span));
            }
            ':' => {
                chars.next();
                let name_start = start + 1;
                let mut end = name_start;
                while let Some(&(i, c)) = chars.peek() {
                    if is_symbol_char(c) {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                if end == name_start {
                    return Err(Diagnostic::error("empty keyword")
                        .with_code(ErrorCode::E005)
                        .with_label(Span::new(start..start + 1), "':' with no name")
                        .with_help("keywords look like :fill or :span"));
                }
                tokens.push(PositionedToken::new(
                    Token::Keyword(&source[name_start..end]),
                    Span::new(start..end),
                ));
            }
            c if c.is_ascii_digit() || matches!(c, '-' | '+') => {
                let (token, span) = lex_word(source, start, &mut chars)?;
                tokens.push(PositionedToken::new(token, span));
            }
            c if is_symbol_start(c) => {
                let (token, span) = lex_word(source, start, &mut chars)?;
                tokens.push(PositionedToken::new(token, span));
            }
            other => {
                return Err(Diagnostic::error(format!("unexpected character '{other}'"))
                    .with_code(ErrorCode::E002)
                    .with_label(Span::new(start..start + other.len_utf8()), "found here"));
            }
        }
    }

    Ok(tokens)
}

fn push_single<'src, I>(
    tokens: &mut Vec<PositionedToken<'src>>,
    chars: &mut std::iter::Peekable<I>,
    token: Token<'src>,
) where
    I: Iterator<Item = (usize, char)>,
{
    if let Some((start, c)) = chars.next() {
        tokens.push(PositionedToken::new(
            token,
            Span::new(start..start + c.len_utf8()),
        ));
    }
}

/// Lex a run of symbol-constituent characters starting at `start`, then
/// classify it as a number or a symbol.
fn lex_word<'src, I>(
    source: &'src str,
    start: usize,
    chars: &mut std::iter::Peekable<I>,
) -> Result<(Token<'src>, Span), Diagnostic>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut end = start;
    while let Some(&(i, c)) = chars.peek() {
        if is_symbol_char(c) {
            end = i + c.len_utf8();
            chars.next();
        } else {
            break;
        }
    }

    let word = &source[start..end];
    let span = Span::new(start..end);
    let first = word.chars().next().unwrap_or_default();
    let second_is_digit = word.chars().nth(1).is_some_and(|c| c.is_ascii_digit());

    if first.is_ascii_digit() || (matches!(first, '-' | '+') && second_is_digit) {
        Ok((lex_number(word, span)?, span))
    } else {
        Ok((Token::Symbol(word), span))
    }
}

/// Parse a number word: decimal or radix-prefixed integer, or a float.
fn lex_number<'src>(word: &str, span: Span) -> Result<Token<'src>, Diagnostic> {
    let invalid = |word: &str| {
        Diagnostic::error(format!("invalid number literal '{word}'"))
            .with_code(ErrorCode::E004)
            .with_label(span, "could not be parsed")
    };

    let (sign, magnitude) = match word.strip_prefix('-') {
        Some(rest) => (-1i64, rest),
        None => (1i64, word.strip_prefix('+').unwrap_or(word)),
    };

    let radix = match magnitude.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };

    if let Some(radix) = radix {
        let digits = &magnitude[2..];
        return i64::from_str_radix(digits, radix)
            .map(|n| Token::IntLiteral(sign * n))
            .map_err(|_| invalid(word));
    }

    if magnitude.contains('.') {
        return word
            .parse::<f64>()
            .map(Token::FloatLiteral)
            .map_err(|_| invalid(word));
    }

    magnitude
        .parse::<i64>()
        .map(|n| Token::IntLiteral(sign * n))
        .map_err(|_| invalid(word))
}

/// Lex a string literal with escape handling.
fn lex_string<'src, I>(
    source: &'src str,
    start: usize,
    chars: &mut std::iter::Peekable<I>,
) -> Result<(Token<'src>, Span), Diagnostic>
where
    I: Iterator<Item = (usize, char)>,
{
    chars.next(); // opening quote
    let mut content = String::new();

    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                return Ok((
                    Token::StringLiteral(content),
                    Span::new(start..i + 1),
                ));
            }
            '\\' => match chars.next() {
                Some((_, 'n')) => content.push('\n'),
                Some((_, 'r')) => content.push('\r'),
                Some((_, 't')) => content.push('\t'),
                Some((_, '\\')) => content.push('\\'),
                Some((_, '"')) => content.push('"'),
                Some((j, other)) => {
                    return Err(Diagnostic::error(format!(
                        "invalid escape sequence '\\{other}'"
                    ))
                    .with_code(ErrorCode::E003)
                    .with_label(Span::new(i..j + other.len_utf8()), "unknown escape")
                    .with_help("valid escapes are \\n, \\r, \\t, \\\\, \\\""));
                }
                None => break,
            },
            other => content.push(other),
        }
    }

    Err(Diagnostic::error("unterminated string literal")
        .with_code(ErrorCode::E001)
        .with_label(Span::new(start..source.len()), "string opened here")
        .with_help("add a closing '\"'"))
}
