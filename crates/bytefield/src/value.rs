//! Runtime values of the description language.

use std::{fmt, rc::Rc};

use bytefield_core::{
    attrs::AttrSet,
    text::{TextFragment, TextRun},
};
use bytefield_parser::Form;
use indexmap::IndexMap;

use crate::env::Env;

/// A runtime value.
///
/// The value domain is closed: scripts can only combine what the language
/// offers, so there is no trait object or user-extensible variant here.
/// Cheap cloning matters more than mutation, hence the `Rc` payloads.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// Keyword name without its leading colon.
    Keyword(Rc<str>),
    Vector(Rc<Vec<Value>>),
    /// Map with keyword keys, preserving source order.
    Map(Rc<IndexMap<String, Value>>),
    Set(Rc<Vec<Value>>),
    /// A caption built by one of the text constructors.
    Text(Rc<TextFragment>),
    /// A styled run produced by `svg/tspan`, only meaningful inside
    /// `svg/text`.
    Run(Rc<TextRun>),
    /// A resolved attribute set, from `defattrs` or an inline style map.
    Attrs(Rc<AttrSet>),
    Closure(Rc<Closure>),
    Builtin(Builtin),
}

impl Value {
    /// Short type name for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Keyword(_) => "keyword",
            Value::Vector(_) => "vector",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Text(_) => "text fragment",
            Value::Run(_) => "text run",
            Value::Attrs(_) => "attribute set",
            Value::Closure(_) => "function",
            Value::Builtin(_) => "builtin",
        }
    }

    /// Numeric coercion used wherever the language accepts "a number".
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }
}

/// A script-defined function: parameters, body forms, and the captured
/// definition environment.
pub struct Closure {
    name: String,
    params: Vec<String>,
    body: Vec<Form>,
    env: Env,
}

impl Closure {
    pub fn new(name: String, params: Vec<String>, body: Vec<Form>, env: Env) -> Self {
        Self {
            name,
            params,
            body,
            env,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn body(&self) -> &[Form] {
        &self.body
    }

    pub fn env(&self) -> &Env {
        &self.env
    }
}

impl fmt::Debug for Closure {
    // The captured environment can reference this closure; printing it
    // would recurse.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// The built-in drawing primitives and text constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    DrawColumnHeaders,
    DrawGroupLabelHeader,
    DrawRowHeader,
    DrawBox,
    NextRow,
    DrawGap,
    DrawBottom,
    HexText,
    LabelText,
    PlainText,
    SvgText,
    SvgTspan,
}

impl Builtin {
    /// The symbol this builtin is bound to in the root environment.
    pub fn name(self) -> &'static str {
        match self {
            Builtin::DrawColumnHeaders => "draw-column-headers",
            Builtin::DrawGroupLabelHeader => "draw-group-label-header",
            Builtin::DrawRowHeader => "draw-row-header",
            Builtin::DrawBox => "draw-box",
            Builtin::NextRow => "next-row",
            Builtin::DrawGap => "draw-gap",
            Builtin::DrawBottom => "draw-bottom",
            Builtin::HexText => "hex-text",
            Builtin::LabelText => "label-text",
            Builtin::PlainText => "plain-text",
            Builtin::SvgText => "svg/text",
            Builtin::SvgTspan => "svg/tspan",
        }
    }

    /// All builtins, for root environment installation.
    pub fn all() -> &'static [Builtin] {
        &[
            Builtin::DrawColumnHeaders,
            Builtin::DrawGroupLabelHeader,
            Builtin::DrawRowHeader,
            Builtin::DrawBox,
            Builtin::NextRow,
            Builtin::DrawGap,
            Builtin::DrawBottom,
            Builtin::HexText,
            Builtin::LabelText,
            Builtin::PlainText,
            Builtin::SvgText,
            Builtin::SvgTspan,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_number_coerces_ints() {
        assert_eq!(Value::Int(18).as_number(), Some(18.0));
        assert_eq!(Value::Float(0.5).as_number(), Some(0.5));
        assert_eq!(Value::Str(Rc::from("18")).as_number(), None);
    }

    #[test]
    fn test_builtin_names_are_bindable_symbols() {
        for builtin in Builtin::all() {
            assert!(!builtin.name().is_empty());
            assert!(!builtin.name().starts_with(':'));
        }
    }
}
