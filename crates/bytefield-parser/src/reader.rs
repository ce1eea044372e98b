//! Reader for description-language tokens.
//!
//! This module transforms a token stream from the [`lexer`](crate::lexer)
//! into nested [`Form`] trees. The public entry point is [`read_program`].

use winnow::{
    Parser as _,
    combinator::{alt, preceded, repeat},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    form::{Form, FormKind},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Context type for reader errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    StartOffset(usize),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Parse whitespace and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| {
        matches!(
            token.token,
            Token::Whitespace | Token::Newline | Token::LineComment(_)
        )
    })
    .void()
    .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse an atomic form
fn atom<'src>(input: &mut Input<'src>) -> IResult<Form> {
    any.verify_map(|token: &PositionedToken<'_>| {
        let kind = match &token.token {
            Token::IntLiteral(n) => FormKind::Int(*n),
            Token::FloatLiteral(n) => FormKind::Float(*n),
            Token::StringLiteral(s) => FormKind::Str(s.clone()),
            Token::Keyword(name) => FormKind::Keyword((*name).to_string()),
            Token::Symbol("nil") => FormKind::Nil,
            Token::Symbol(name) => FormKind::Symbol((*name).to_string()),
            _ => return None,
        };
        Some(Form::new(kind, token.span))
    })
    .context(Context::Label("atom"))
    .parse_next(input)
}

/// Parse the items of a compound form up to and including its closer.
///
/// The closer must be the matching delimiter; a different closing delimiter
/// is reported, not accepted.
fn items_until_close<'src>(
    input: &mut Input<'src>,
    closer: fn(&Token<'_>) -> bool,
    closer_label: &'static str,
) -> IResult<(Vec<Form>, Span)> {
    let items: Vec<Form> = repeat(0.., preceded(ws_comments0, form)).parse_next(input)?;
    ws_comments0.parse_next(input)?;
    let close = any
        .verify(move |token: &PositionedToken<'_>| closer(&token.token))
        .context(Context::Label(closer_label))
        .parse_next(input)?;
    Ok((items, close.span))
}

/// Parse a list form: `( … )`
fn list<'src>(input: &mut Input<'src>) -> IResult<Form> {
    let open = any
        .verify(|token: &PositionedToken<'_>| matches!(token.token, Token::LeftParen))
        .parse_next(input)?;
    let open_span = open.span;

    cut_err(input, |input| {
        let (items, close_span) = items_until_close(
            input,
            |token| matches!(token, Token::RightParen),
            "closing ')'",
        )?;
        Ok(Form::new(FormKind::List(items), open_span.union(close_span)))
    })
}

/// Parse a vector form: `[ … ]`
fn vector<'src>(input: &mut Input<'src>) -> IResult<Form> {
    let open = any
        .verify(|token: &PositionedToken<'_>| matches!(token.token, Token::LeftBracket))
        .parse_next(input)?;
    let open_span = open.span;

    cut_err(input, |input| {
        let (items, close_span) = items_until_close(
            input,
            |token| matches!(token, Token::RightBracket),
            "closing ']'",
        )?;
        Ok(Form::new(
            FormKind::Vector(items),
            open_span.union(close_span),
        ))
    })
}

/// Parse a set form: `#{ … }`
fn set<'src>(input: &mut Input<'src>) -> IResult<Form> {
    let open = any
        .verify(|token: &PositionedToken<'_>| matches!(token.token, Token::HashLeftBrace))
        .parse_next(input)?;
    let open_span = open.span;

    cut_err(input, |input| {
        let (items, close_span) = items_until_close(
            input,
            |token| matches!(token, Token::RightBrace),
            "closing '}'",
        )?;
        Ok(Form::new(FormKind::Set(items), open_span.union(close_span)))
    })
}

/// Parse a map form: `{ k v … }`
///
/// An odd number of inner forms is a reader error; maps are key-value pairs.
fn map<'src>(input: &mut Input<'src>) -> IResult<Form> {
    let open = any
        .verify(|token: &PositionedToken<'_>| matches!(token.token, Token::LeftBrace))
        .parse_next(input)?;
    let open_span = open.span;

    cut_err(input, |input| {
        let (items, close_span) = items_until_close(
            input,
            |token| matches!(token, Token::RightBrace),
            "closing '}'",
        )?;
        if items.len() % 2 != 0 {
            let mut e = ContextError::new();
            e.push(Context::Label("value for trailing map key"));
            return Err(ErrMode::Cut(e));
        }
        let mut pairs = Vec::with_capacity(items.len() / 2);
        let mut iter = items.into_iter();
        while let (Some(key), Some(value)) = (iter.next(), iter.next()) {
            pairs.push((key, value));
        }
        Ok(Form::new(FormKind::Map(pairs), open_span.union(close_span)))
    })
}

/// Parse any single form
fn form<'src>(input: &mut Input<'src>) -> IResult<Form> {
    alt((atom, list, vector, set, map))
        .context(Context::Label("form"))
        .parse_next(input)
}

/// Utility function to convert winnow errors to our diagnostic format.
///
/// Extracts position information from error context (StartOffset) and
/// calculates error spans from the token array.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken],
    current_remaining: usize,
) -> Diagnostic {
    let context_error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => {
            // Streaming input is not supported, so this cannot happen.
            return Diagnostic::error("incomplete input")
                .with_code(ErrorCode::E101)
                .with_help("ensure the description is complete");
        }
    };

    let start_remaining = context_error.context().find_map(|ctx| match ctx {
        Context::StartOffset(n) => Some(*n),
        _ => None,
    });

    // Calculate offsets from remaining token counts
    let end_offset = tokens.len() - current_remaining;
    let start_offset = start_remaining.map(|r| tokens.len() - r).unwrap_or(0);

    let contexts: Vec<String> = context_error
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(format!("expected {label}")),
            _ => None,
        })
        .collect();

    let message = if contexts.is_empty() {
        String::from("unexpected token or end of input")
    } else {
        contexts.join(", ")
    };

    let at_eof = end_offset >= tokens.len();
    let error_span = if at_eof {
        // Point at everything from where the failing compound started.
        span_of_range(tokens, start_offset..tokens.len())
    } else if start_offset < end_offset {
        span_of_range(tokens, start_offset..end_offset + 1)
    } else {
        tokens[end_offset].span
    };

    if at_eof {
        Diagnostic::error(format!("unexpected end of input: {message}"))
            .with_code(ErrorCode::E101)
            .with_label(error_span, "unclosed form starts here")
            .with_help("check for a missing closing delimiter")
    } else {
        Diagnostic::error(format!("unexpected token: {message}"))
            .with_code(ErrorCode::E100)
            .with_label(error_span, "unexpected token")
            .with_help("check syntax and delimiter nesting")
    }
}

/// Union of meaningful token spans in the given range.
fn span_of_range(tokens: &[PositionedToken], range: std::ops::Range<usize>) -> Span {
    let slice = &tokens[range];
    let meaningful = |t: &&PositionedToken| !matches!(t.token, Token::Whitespace | Token::Newline);
    let first = slice.iter().find(meaningful).map(|t| t.span);
    let last = slice.iter().rev().find(meaningful).map(|t| t.span);
    match (first, last) {
        (Some(first), Some(last)) => first.union(last),
        _ => slice.first().map(|t| t.span).unwrap_or_default(),
    }
}

/// Read a complete program: a sequence of top-level forms.
pub fn read_program<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Vec<Form>, Diagnostic> {
    let mut input = TokenSlice::new(tokens);
    let mut forms = Vec::new();

    loop {
        ws_comments0.parse_next(&mut input).unwrap_or_default();
        if input.is_empty() {
            return Ok(forms);
        }

        // A stray closer at the top level gets its own message; the generic
        // path would only say a form failed to start.
        let checkpoint = input.checkpoint();
        let closer = any::<_, ErrMode<ContextError>>
            .verify(|token: &PositionedToken<'_>| {
                matches!(
                    token.token,
                    Token::RightParen | Token::RightBracket | Token::RightBrace
                )
            })
            .parse_next(&mut input);
        if let Ok(token) = closer {
            return Err(Diagnostic::error(format!(
                "unmatched closing delimiter '{}'",
                token.token
            ))
            .with_code(ErrorCode::E102)
            .with_label(token.span, "no matching opener")
            .with_help("remove it or add the matching opening delimiter"));
        }
        input.reset(&checkpoint);

        match form.parse_next(&mut input) {
            Ok(parsed) => forms.push(parsed),
            Err(e) => {
                let current_remaining = input.eof_offset();
                return Err(convert_error(e, tokens, current_remaining));
            }
        }
    }
}
