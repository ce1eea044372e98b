//! The closed set of drawing primitives and text constructors.
//!
//! Drawing primitives mutate the interpreter's layout state; text
//! constructors are pure and produce [`TextFragment`] values for `:text`
//! options. Option parsing is shared: keyword arguments come in pairs and
//! unknown option names are errors, never silently ignored.

use std::rc::Rc;

use bytefield_core::{
    attrs::{AttrSet, EdgeSet},
    color::Color,
    text::{FontConfig, RichItem, RichText, RunStyle, TextFragment, TextRun},
};
use bytefield_parser::Span;
use indexmap::IndexMap;

use crate::{
    config::Metrics,
    env::Env,
    error::EvalError,
    eval::Interpreter,
    layout::{LayoutViolation, ResolvedMetrics},
    value::{Builtin, Value},
};

/// Border shorthands pre-bound as named attribute sets. A box tagged
/// `:box-related` omits its left and right strokes so a run of adjacent
/// boxes reads as one multi-byte field.
const BORDER_SHORTHANDS: [(&str, &[&str]); 5] = [
    ("box-first", &["left", "top", "bottom"]),
    ("box-related", &["top", "bottom"]),
    ("box-last", &["right", "top", "bottom"]),
    ("box-above", &["left", "right", "top"]),
    ("box-below", &["left", "right", "bottom"]),
];

/// Populates a fresh root environment: primitives, metric symbols, font
/// family names, and the border shorthands.
pub(crate) fn install_root(env: &Env, metrics: &Metrics, fonts: &FontConfig) {
    for builtin in Builtin::all() {
        env.define(builtin.name(), Value::Builtin(*builtin));
    }

    env.define(
        "boxes-per-row",
        Value::Int(i64::from(metrics.boxes_per_row())),
    );
    env.define("box-width", number_value(metrics.box_width()));
    env.define("row-height", number_value(metrics.row_height()));
    env.define("left-margin", number_value(metrics.left_margin()));
    env.define(
        "column-header-height",
        number_value(metrics.column_header_height()),
    );
    env.define("hex-family", Value::Str(Rc::from(fonts.hex_family.as_str())));
    env.define(
        "serif-family",
        Value::Str(Rc::from(fonts.serif_family.as_str())),
    );

    for (name, edges) in BORDER_SHORTHANDS {
        let edges = EdgeSet::from_names(edges.iter().copied())
            .expect("shorthand edge names are valid");
        env.define_attrs(name, Value::Attrs(Rc::new(AttrSet::with_borders(edges))));
    }
}

fn number_value(n: f32) -> Value {
    if n.fract() == 0.0 {
        Value::Int(n as i64)
    } else {
        Value::Float(f64::from(n))
    }
}

impl Interpreter {
    pub(crate) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: &[Value],
        env: &Env,
        span: Span,
    ) -> Result<Value, EvalError> {
        match builtin {
            Builtin::DrawColumnHeaders => {
                expect_arity("draw-column-headers", args, 0, span)?;
                let m = self.metrics(env, span)?;
                self.layout
                    .draw_column_headers(&m)
                    .map_err(|v| violation_error(v, span))?;
                Ok(Value::Nil)
            }
            Builtin::DrawGroupLabelHeader => {
                expect_arity("draw-group-label-header", args, 2, span)?;
                let box_span = positive_int(&args[0], "draw-group-label-header span", span)?;
                let label = string(&args[1], "draw-group-label-header label", span)?;
                let m = self.metrics(env, span)?;
                self.layout
                    .draw_group_label_header(&m, box_span, &label)
                    .map_err(|v| violation_error(v, span))?;
                Ok(Value::Nil)
            }
            Builtin::DrawRowHeader => {
                expect_arity("draw-row-header", args, 1, span)?;
                let label = match &args[0] {
                    Value::Str(s) => s.to_string(),
                    Value::Int(n) if *n >= 0 => format!("{n:02x}"),
                    other => {
                        return Err(EvalError::TypeMismatch {
                            context: String::from("draw-row-header label"),
                            expected: String::from("string or non-negative integer"),
                            actual: other.type_name().to_owned(),
                            span,
                        });
                    }
                };
                let m = self.metrics(env, span)?;
                self.layout
                    .draw_row_header(&m, &label)
                    .map_err(|v| violation_error(v, span))?;
                Ok(Value::Nil)
            }
            Builtin::DrawBox => self.builtin_draw_box(args, env, span),
            Builtin::NextRow => {
                let mut height = None;
                for (name, value) in keyword_pairs("next-row", args, span)? {
                    match name {
                        "height" => {
                            let h = number(value, "next-row :height", span)?;
                            if h <= 0.0 {
                                return Err(EvalError::MalformedForm {
                                    callee: String::from("next-row"),
                                    reason: String::from("row height must be positive"),
                                    span,
                                });
                            }
                            height = Some(h as f32);
                        }
                        other => {
                            return Err(EvalError::UnknownOption {
                                callee: String::from("next-row"),
                                name: other.to_owned(),
                                span,
                            });
                        }
                    }
                }
                let m = self.metrics(env, span)?;
                self.layout
                    .next_row(&m, height)
                    .map_err(|v| violation_error(v, span))?;
                Ok(Value::Nil)
            }
            Builtin::DrawGap => {
                expect_arity("draw-gap", args, 0, span)?;
                let m = self.metrics(env, span)?;
                self.layout
                    .draw_gap(&m)
                    .map_err(|v| violation_error(v, span))?;
                Ok(Value::Nil)
            }
            Builtin::DrawBottom => {
                expect_arity("draw-bottom", args, 0, span)?;
                let m = self.metrics(env, span)?;
                self.layout
                    .draw_bottom(&m)
                    .map_err(|v| violation_error(v, span))?;
                Ok(Value::Nil)
            }
            Builtin::HexText => builtin_hex_text(args, span),
            Builtin::LabelText => builtin_label_text(args, span),
            Builtin::PlainText => {
                expect_arity("plain-text", args, 1, span)?;
                let content = string(&args[0], "plain-text argument", span)?;
                Ok(Value::Text(Rc::new(TextFragment::Plain(content))))
            }
            Builtin::SvgText => builtin_svg_text(args, span),
            Builtin::SvgTspan => {
                expect_arity("svg/tspan", args, 2, span)?;
                let style = style_map(&args[0], "svg/tspan style", span)?;
                let content = string(&args[1], "svg/tspan content", span)?;
                Ok(Value::Run(Rc::new(TextRun { content, style })))
            }
        }
    }

    /// Layout metrics, snapshotted from the environment at the first
    /// drawing call of the render and fixed for its remainder.
    fn metrics(&mut self, env: &Env, span: Span) -> Result<ResolvedMetrics, EvalError> {
        if let Some(m) = self.resolved {
            return Ok(m);
        }
        let m = ResolvedMetrics {
            box_width: lookup_number(env, "box-width", span)?,
            row_height: lookup_number(env, "row-height", span)?,
            left_margin: lookup_number(env, "left-margin", span)?,
            boxes_per_row: lookup_count(env, "boxes-per-row", span)?,
            column_header_height: lookup_number(env, "column-header-height", span)?,
        };
        self.resolved = Some(m);
        Ok(m)
    }

    fn builtin_draw_box(
        &mut self,
        args: &[Value],
        env: &Env,
        span: Span,
    ) -> Result<Value, EvalError> {
        let mut caption: Option<Rc<TextFragment>> = None;
        let mut box_span: u32 = 1;
        let mut layers: Vec<AttrSet> = Vec::new();
        let mut overrides = AttrSet::new();

        for (name, value) in keyword_pairs("draw-box", args, span)? {
            match name {
                "text" => caption = caption_from_value(value, span)?,
                "span" => box_span = positive_int(value, "draw-box :span", span)?,
                "fill" => overrides.set_fill(color_from_value(value, span)?),
                "borders" => overrides.set_borders(edges_from_value(value, span)?),
                "font-weight" => {
                    overrides.set_font_weight(string(value, "draw-box :font-weight", span)?);
                }
                "attrs" => collect_attr_layers(value, env, &mut layers, span)?,
                other => {
                    return Err(EvalError::UnknownOption {
                        callee: String::from("draw-box"),
                        name: other.to_owned(),
                        span,
                    });
                }
            }
        }

        // Named and inline attribute sets apply in argument order, with the
        // direct :fill / :borders / :font-weight options on top.
        let mut attrs = AttrSet::new();
        for layer in &layers {
            attrs.merge_from(layer);
        }
        attrs.merge_from(&overrides);

        let m = self.metrics(env, span)?;
        self.layout
            .draw_box(&m, caption.as_deref(), box_span, &attrs)
            .map_err(|v| violation_error(v, span))?;
        Ok(Value::Nil)
    }
}

fn builtin_hex_text(args: &[Value], span: Span) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Err(EvalError::ArityMismatch {
            callee: String::from("hex-text"),
            expected: String::from("at least 1"),
            actual: 0,
            span,
        });
    }

    let mut digit_count = None;
    let mut rest = &args[1..];
    if let Some(Value::Int(n)) = rest.first() {
        if *n <= 0 {
            return Err(EvalError::MalformedForm {
                callee: String::from("hex-text"),
                reason: String::from("digit count must be positive"),
                span,
            });
        }
        digit_count = Some(*n as usize);
        rest = &rest[1..];
    }

    let mut font_weight = None;
    for (name, value) in keyword_pairs("hex-text", rest, span)? {
        match name {
            "font-weight" => font_weight = Some(string(value, "hex-text :font-weight", span)?),
            other => {
                return Err(EvalError::UnknownOption {
                    callee: String::from("hex-text"),
                    name: other.to_owned(),
                    span,
                });
            }
        }
    }

    let digits = hex_digits(&args[0], digit_count, span)?;
    Ok(Value::Text(Rc::new(TextFragment::Hex {
        digits,
        font_weight,
    })))
}

/// Formats the hex-text value: strings pass through verbatim, integers are
/// rendered zero-padded to the requested digit count (default 2).
fn hex_digits(value: &Value, digit_count: Option<usize>, span: Span) -> Result<String, EvalError> {
    match value {
        Value::Str(s) => {
            if digit_count.is_some() {
                return Err(EvalError::MalformedForm {
                    callee: String::from("hex-text"),
                    reason: String::from("a digit count only applies to numeric values"),
                    span,
                });
            }
            Ok(s.to_string())
        }
        Value::Int(n) if *n >= 0 => {
            let width = digit_count.unwrap_or(2);
            Ok(format!("{n:0width$x}"))
        }
        other => Err(EvalError::TypeMismatch {
            context: String::from("hex-text value"),
            expected: String::from("string or non-negative integer"),
            actual: other.type_name().to_owned(),
            span,
        }),
    }
}

fn builtin_label_text(args: &[Value], span: Span) -> Result<Value, EvalError> {
    if args.is_empty() || args.len() > 2 {
        return Err(EvalError::ArityMismatch {
            callee: String::from("label-text"),
            expected: String::from("1 or 2"),
            actual: args.len(),
            span,
        });
    }
    let prefix = string(&args[0], "label-text prefix", span)?;
    let subscript = match args.get(1) {
        None | Some(Value::Nil) => None,
        Some(Value::Str(s)) => Some(s.to_string()),
        Some(Value::Int(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(EvalError::TypeMismatch {
                context: String::from("label-text subscript"),
                expected: String::from("string or integer"),
                actual: other.type_name().to_owned(),
                span,
            });
        }
    };
    Ok(Value::Text(Rc::new(TextFragment::Label {
        prefix,
        subscript,
    })))
}

fn builtin_svg_text(args: &[Value], span: Span) -> Result<Value, EvalError> {
    let Some((style_arg, items_args)) = args.split_first() else {
        return Err(EvalError::ArityMismatch {
            callee: String::from("svg/text"),
            expected: String::from("at least 1"),
            actual: 0,
            span,
        });
    };
    let style = style_map(style_arg, "svg/text style", span)?;

    let mut items = Vec::with_capacity(items_args.len());
    for item in items_args {
        match item {
            Value::Str(s) => items.push(RichItem::Str(s.to_string())),
            Value::Run(run) => items.push(RichItem::Span((**run).clone())),
            other => {
                return Err(EvalError::TypeMismatch {
                    context: String::from("svg/text item"),
                    expected: String::from("string or svg/tspan run"),
                    actual: other.type_name().to_owned(),
                    span,
                });
            }
        }
    }

    Ok(Value::Text(Rc::new(TextFragment::Rich(RichText {
        style,
        items,
    }))))
}

/// Resolves a named attribute set from the `:attrs` option.
fn collect_attr_layers(
    value: &Value,
    env: &Env,
    layers: &mut Vec<AttrSet>,
    span: Span,
) -> Result<(), EvalError> {
    match value {
        Value::Keyword(name) => match env.lookup_attrs(name) {
            Some(Value::Attrs(attrs)) => layers.push((*attrs).clone()),
            _ => {
                return Err(EvalError::UnboundAttrs {
                    name: name.to_string(),
                    span,
                });
            }
        },
        Value::Attrs(attrs) => layers.push((**attrs).clone()),
        Value::Map(map) => layers.push(attrs_from_map(map, span)?),
        Value::Vector(items) => {
            for item in items.iter() {
                collect_attr_layers(item, env, layers, span)?;
            }
        }
        other => {
            return Err(EvalError::TypeMismatch {
                context: String::from("draw-box :attrs"),
                expected: String::from("keyword, map, attribute set, or vector of those"),
                actual: other.type_name().to_owned(),
                span,
            });
        }
    }
    Ok(())
}

/// Builds an [`AttrSet`] from an evaluated property map. Shared between
/// `defattrs` bodies and inline `:attrs` maps.
pub(crate) fn attrs_from_map(
    map: &IndexMap<String, Value>,
    span: Span,
) -> Result<AttrSet, EvalError> {
    let mut attrs = AttrSet::new();
    for (key, value) in map {
        match key.as_str() {
            "fill" => attrs.set_fill(color_from_value(value, span)?),
            "borders" => attrs.set_borders(edges_from_value(value, span)?),
            "font-weight" => attrs.set_font_weight(string(value, "attribute :font-weight", span)?),
            "font-size" => attrs.set_font_size(number(value, "attribute :font-size", span)? as f32),
            "font-family" => {
                attrs.set_font_family(string(value, "attribute :font-family", span)?);
            }
            other => {
                return Err(EvalError::UnknownOption {
                    callee: String::from("attribute map"),
                    name: other.to_owned(),
                    span,
                });
            }
        }
    }
    Ok(attrs)
}

fn style_map(value: &Value, context: &str, span: Span) -> Result<RunStyle, EvalError> {
    let Value::Map(map) = value else {
        return Err(EvalError::TypeMismatch {
            context: context.to_owned(),
            expected: String::from("map"),
            actual: value.type_name().to_owned(),
            span,
        });
    };

    let mut style = RunStyle::default();
    for (key, value) in map.iter() {
        match key.as_str() {
            "font-size" => style.font_size = Some(number(value, "style :font-size", span)? as f32),
            "font-family" => {
                style.font_family = Some(string(value, "style :font-family", span)?);
            }
            "font-weight" => {
                style.font_weight = Some(string(value, "style :font-weight", span)?);
            }
            "dominant-baseline" => {
                style.dominant_baseline = Some(string(value, "style :dominant-baseline", span)?);
            }
            "text-anchor" => {
                style.text_anchor = Some(string(value, "style :text-anchor", span)?);
            }
            other => {
                return Err(EvalError::UnknownOption {
                    callee: context.to_owned(),
                    name: other.to_owned(),
                    span,
                });
            }
        }
    }
    Ok(style)
}

fn caption_from_value(value: &Value, span: Span) -> Result<Option<Rc<TextFragment>>, EvalError> {
    match value {
        Value::Nil => Ok(None),
        Value::Text(fragment) => Ok(Some(fragment.clone())),
        Value::Str(s) => Ok(Some(Rc::new(TextFragment::Plain(s.to_string())))),
        Value::Int(n) if *n >= 0 => Ok(Some(Rc::new(TextFragment::Hex {
            digits: format!("{n:02x}"),
            font_weight: None,
        }))),
        other => Err(EvalError::TypeMismatch {
            context: String::from("draw-box :text"),
            expected: String::from("text fragment, string, integer, or nil"),
            actual: other.type_name().to_owned(),
            span,
        }),
    }
}

fn color_from_value(value: &Value, span: Span) -> Result<Color, EvalError> {
    let Value::Str(s) = value else {
        return Err(EvalError::TypeMismatch {
            context: String::from("fill color"),
            expected: String::from("string"),
            actual: value.type_name().to_owned(),
            span,
        });
    };
    Color::new(s).map_err(|message| EvalError::InvalidColor { message, span })
}

fn edges_from_value(value: &Value, span: Span) -> Result<EdgeSet, EvalError> {
    let Value::Set(items) = value else {
        return Err(EvalError::TypeMismatch {
            context: String::from("borders"),
            expected: String::from("set of edge keywords"),
            actual: value.type_name().to_owned(),
            span,
        });
    };
    let mut names = Vec::with_capacity(items.len());
    for item in items.iter() {
        let Value::Keyword(name) = item else {
            return Err(EvalError::TypeMismatch {
                context: String::from("border edge"),
                expected: String::from("keyword"),
                actual: item.type_name().to_owned(),
                span,
            });
        };
        names.push(&**name);
    }
    EdgeSet::from_names(names).map_err(|reason| EvalError::MalformedForm {
        callee: String::from("borders"),
        reason,
        span,
    })
}

fn keyword_pairs<'a>(
    callee: &str,
    args: &'a [Value],
    span: Span,
) -> Result<Vec<(&'a str, &'a Value)>, EvalError> {
    let mut pairs = Vec::with_capacity(args.len() / 2);
    let mut iter = args.iter();
    while let Some(key) = iter.next() {
        let Value::Keyword(name) = key else {
            return Err(EvalError::TypeMismatch {
                context: format!("{callee} options"),
                expected: String::from("keyword"),
                actual: key.type_name().to_owned(),
                span,
            });
        };
        let Some(value) = iter.next() else {
            return Err(EvalError::MalformedForm {
                callee: callee.to_owned(),
                reason: format!("option :{name} is missing a value"),
                span,
            });
        };
        pairs.push((&**name, value));
    }
    Ok(pairs)
}

fn expect_arity(callee: &str, args: &[Value], expected: usize, span: Span) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::ArityMismatch {
            callee: callee.to_owned(),
            expected: expected.to_string(),
            actual: args.len(),
            span,
        })
    }
}

fn string(value: &Value, context: &str, span: Span) -> Result<String, EvalError> {
    match value {
        Value::Str(s) => Ok(s.to_string()),
        other => Err(EvalError::TypeMismatch {
            context: context.to_owned(),
            expected: String::from("string"),
            actual: other.type_name().to_owned(),
            span,
        }),
    }
}

fn number(value: &Value, context: &str, span: Span) -> Result<f64, EvalError> {
    value.as_number().ok_or_else(|| EvalError::TypeMismatch {
        context: context.to_owned(),
        expected: String::from("number"),
        actual: value.type_name().to_owned(),
        span,
    })
}

fn positive_int(value: &Value, context: &str, span: Span) -> Result<u32, EvalError> {
    match value {
        Value::Int(n) if *n > 0 && *n <= i64::from(u32::MAX) => Ok(*n as u32),
        other => Err(EvalError::TypeMismatch {
            context: context.to_owned(),
            expected: String::from("positive integer"),
            actual: other.type_name().to_owned(),
            span,
        }),
    }
}

fn lookup_number(env: &Env, name: &str, span: Span) -> Result<f32, EvalError> {
    let value = env.lookup(name).ok_or_else(|| EvalError::UnboundSymbol {
        name: name.to_owned(),
        span,
    })?;
    number(&value, &format!("value of {name}"), span).map(|n| n as f32)
}

fn lookup_count(env: &Env, name: &str, span: Span) -> Result<u32, EvalError> {
    let value = env.lookup(name).ok_or_else(|| EvalError::UnboundSymbol {
        name: name.to_owned(),
        span,
    })?;
    positive_int(&value, &format!("value of {name}"), span)
}

fn violation_error(violation: LayoutViolation, span: Span) -> EvalError {
    match violation {
        LayoutViolation::BoxOverflow {
            column,
            box_span,
            row_width,
        }
        | LayoutViolation::HeaderOverflow {
            column,
            box_span,
            row_width,
        } => EvalError::RowOverflow {
            column,
            box_span,
            row_width,
            span,
        },
        LayoutViolation::Finished => EvalError::AfterBottom { span },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digits_pads_integers() {
        let span = Span::default();
        assert_eq!(hex_digits(&Value::Int(0x0c), None, span).unwrap(), "0c");
        assert_eq!(hex_digits(&Value::Int(0x2104), Some(8), span).unwrap(), "00002104");
    }

    #[test]
    fn test_hex_digits_passes_strings_verbatim() {
        let span = Span::default();
        assert_eq!(
            hex_digits(&Value::Str("872349ae".into()), None, span).unwrap(),
            "872349ae"
        );
        assert!(hex_digits(&Value::Str("11".into()), Some(4), span).is_err());
    }

    #[test]
    fn test_keyword_pairs_rejects_dangling_option() {
        let span = Span::default();
        let args = [Value::Keyword("span".into())];
        let err = keyword_pairs("draw-box", &args, span).unwrap_err();
        assert!(err.to_string().contains(":span"));
    }

    #[test]
    fn test_attrs_from_map_rejects_unknown_property() {
        let span = Span::default();
        let mut map = IndexMap::new();
        map.insert(String::from("opacity"), Value::Float(0.5));
        let err = attrs_from_map(&map, span).unwrap_err();
        assert!(matches!(err, EvalError::UnknownOption { .. }));
    }

    #[test]
    fn test_attrs_from_map_parses_properties() {
        let span = Span::default();
        let mut map = IndexMap::new();
        map.insert(String::from("fill"), Value::Str("#e4b5f7".into()));
        map.insert(
            String::from("borders"),
            Value::Set(Rc::new(vec![
                Value::Keyword("top".into()),
                Value::Keyword("bottom".into()),
            ])),
        );
        let attrs = attrs_from_map(&map, span).unwrap();
        assert!(attrs.fill().is_some());
        assert!(attrs.borders().top());
        assert!(!attrs.borders().left());
    }

    #[test]
    fn test_install_root_binds_shorthands_and_metrics() {
        let env = Env::root();
        install_root(&env, &Metrics::default(), &FontConfig::default());
        assert!(matches!(env.lookup("boxes-per-row"), Some(Value::Int(16))));
        assert!(matches!(env.lookup("draw-box"), Some(Value::Builtin(_))));
        assert!(matches!(
            env.lookup_attrs("box-related"),
            Some(Value::Attrs(_))
        ));
        assert!(matches!(env.lookup("hex-family"), Some(Value::Str(_))));
    }
}
