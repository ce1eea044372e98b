//! Parsed expression trees for the description language.

use std::fmt;

use crate::span::Span;

/// One parsed expression with its source span.
///
/// Forms are immutable once read; the evaluator walks them without
/// modification and closures clone the subtrees they capture.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    kind: FormKind,
    span: Span,
}

impl Form {
    pub fn new(kind: FormKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn kind(&self) -> &FormKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }
}

/// The shape of a form: an atom or a compound.
#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    Nil,
    Int(i64),
    Float(f64),
    Str(String),
    /// Keyword without its leading colon.
    Keyword(String),
    Symbol(String),
    /// `( … )` — a call or special form.
    List(Vec<Form>),
    /// `[ … ]` — a sequence literal.
    Vector(Vec<Form>),
    /// `{ k v … }` — pairs in source order.
    Map(Vec<(Form, Form)>),
    /// `#{ … }` — a set literal.
    Set(Vec<Form>),
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Form]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }

        match self.kind() {
            FormKind::Nil => write!(f, "nil"),
            FormKind::Int(n) => write!(f, "{n}"),
            FormKind::Float(n) => write!(f, "{n}"),
            FormKind::Str(s) => write!(f, "\"{s}\""),
            FormKind::Keyword(name) => write!(f, ":{name}"),
            FormKind::Symbol(name) => write!(f, "{name}"),
            FormKind::List(items) => {
                write!(f, "(")?;
                write_seq(f, items)?;
                write!(f, ")")
            }
            FormKind::Vector(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            FormKind::Map(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{k} {v}")?;
                }
                write!(f, "}}")
            }
            FormKind::Set(items) => {
                write!(f, "#{{")?;
                write_seq(f, items)?;
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: FormKind) -> Form {
        Form::new(kind, Span::default())
    }

    #[test]
    fn test_display_round_trips_shape() {
        let call = form(FormKind::List(vec![
            form(FormKind::Symbol(String::from("draw-box"))),
            form(FormKind::Keyword(String::from("span"))),
            form(FormKind::Int(4)),
        ]));
        assert_eq!(call.to_string(), "(draw-box :span 4)");
    }

    #[test]
    fn test_display_set_and_map() {
        let set = form(FormKind::Set(vec![
            form(FormKind::Keyword(String::from("left"))),
            form(FormKind::Keyword(String::from("top"))),
        ]));
        assert_eq!(set.to_string(), "#{:left :top}");

        let map = form(FormKind::Map(vec![(
            form(FormKind::Keyword(String::from("fill"))),
            form(FormKind::Str(String::from("#a0ffa0"))),
        )]));
        assert_eq!(map.to_string(), "{:fill \"#a0ffa0\"}");
    }
}
