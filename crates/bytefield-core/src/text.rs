//! Text fragment model for box captions and header labels.
//!
//! Diagram scripts build captions with the `hex-text`, `label-text`,
//! `plain-text` and `svg/text` constructors. Those all resolve to a
//! [`TextFragment`], which is positioned by the layout engine and rendered
//! here into an SVG `<text>` element with optional `<tspan>` children.
//!
//! Unlike shaped diagram text, byte field captions use fixed font metrics:
//! every box is a whole number of byte columns wide, so no measurement pass
//! is needed before rendering.

use svg::node::element as svg_element;

use crate::geometry::Point;

/// Font configuration shared by all text fragments of one render.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    /// Monospace family for hexadecimal content.
    pub hex_family: String,
    /// Proportional family for labels and plain captions.
    pub serif_family: String,
    /// Base caption size in pixels.
    pub size: f32,
    /// Size used for subscript runs.
    pub subscript_size: f32,
    /// Downward shift applied to subscript runs.
    pub subscript_dy: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            hex_family: String::from("Courier New, monospace"),
            serif_family: String::from("Palatino, Georgia, Times New Roman, serif"),
            size: 16.0,
            subscript_size: 11.0,
            subscript_dy: 4.0,
        }
    }
}

/// Style overrides carried by a rich text run.
///
/// Unset fields fall back to the defaults the layout engine applies for the
/// fragment kind (centered anchor, middle baseline, base caption size).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStyle {
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub dominant_baseline: Option<String>,
    pub text_anchor: Option<String>,
}

impl RunStyle {
    /// Returns true when no property is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A single styled run inside a rich fragment (one `<tspan>`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub content: String,
    pub style: RunStyle,
}

/// One item of a rich fragment: literal text on the base style, or a
/// separately styled run.
#[derive(Debug, Clone, PartialEq)]
pub enum RichItem {
    Str(String),
    Span(TextRun),
}

/// Rich text: a base style plus a sequence of items sharing one baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct RichText {
    pub style: RunStyle,
    pub items: Vec<RichItem>,
}

/// A box caption, resolved to absolute coordinates just before emission.
#[derive(Debug, Clone, PartialEq)]
pub enum TextFragment {
    /// Literal text in the serif family.
    Plain(String),
    /// Fixed-width hexadecimal numeral in the monospace family.
    Hex {
        digits: String,
        font_weight: Option<String>,
    },
    /// A word with an optional nested subscript run.
    Label {
        prefix: String,
        subscript: Option<String>,
    },
    /// Mixed-style runs concatenated on one baseline.
    Rich(RichText),
}

impl TextFragment {
    /// Renders the fragment centered at `position`.
    ///
    /// The anchor and baseline default to `middle` so a fragment placed at a
    /// box center lands visually centered; rich fragments may override both.
    pub fn render(&self, position: Point, fonts: &FontConfig) -> svg_element::Text {
        let base = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-size", fonts.size);

        match self {
            TextFragment::Plain(content) => base
                .set("font-family", fonts.serif_family.as_str())
                .add(svg::node::Text::new(content)),
            TextFragment::Hex {
                digits,
                font_weight,
            } => {
                let text = base.set("font-family", fonts.hex_family.as_str());
                let text = match font_weight {
                    Some(weight) => text.set("font-weight", weight.as_str()),
                    None => text,
                };
                text.add(svg::node::Text::new(digits))
            }
            TextFragment::Label { prefix, subscript } => {
                let text = base
                    .set("font-family", fonts.serif_family.as_str())
                    .add(svg::node::Text::new(prefix));
                match subscript {
                    Some(sub) => text.add(
                        svg_element::TSpan::new("")
                            .set("font-size", fonts.subscript_size)
                            .set("dy", fonts.subscript_dy)
                            .add(svg::node::Text::new(sub)),
                    ),
                    None => text,
                }
            }
            TextFragment::Rich(rich) => {
                let mut text = apply_style(base, &rich.style);
                for item in &rich.items {
                    text = match item {
                        RichItem::Str(content) => text.add(svg::node::Text::new(content)),
                        RichItem::Span(run) => {
                            let tspan = apply_style(svg_element::TSpan::new(""), &run.style);
                            text.add(tspan.add(svg::node::Text::new(&run.content)))
                        }
                    };
                }
                text
            }
        }
    }
}

fn apply_style<T: svg::Node>(node: T, style: &RunStyle) -> T {
    let mut node = node;
    if let Some(size) = style.font_size {
        node.assign("font-size", size);
    }
    if let Some(family) = &style.font_family {
        node.assign("font-family", family.as_str());
    }
    if let Some(weight) = &style.font_weight {
        node.assign("font-weight", weight.as_str());
    }
    if let Some(baseline) = &style.dominant_baseline {
        node.assign("dominant-baseline", baseline.as_str());
    }
    if let Some(anchor) = &style.text_anchor {
        node.assign("text-anchor", anchor.as_str());
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_string(fragment: &TextFragment) -> String {
        fragment
            .render(Point::new(60.0, 15.0), &FontConfig::default())
            .to_string()
    }

    #[test]
    fn test_plain_fragment_uses_serif_family() {
        let out = render_string(&TextFragment::Plain(String::from("Unknown bytes")));
        assert!(out.contains("Unknown bytes"));
        assert!(out.contains("Palatino"));
        assert!(out.contains("text-anchor=\"middle\""));
    }

    #[test]
    fn test_hex_fragment_carries_weight() {
        let out = render_string(&TextFragment::Hex {
            digits: String::from("0f"),
            font_weight: Some(String::from("bold")),
        });
        assert!(out.contains("0f"));
        assert!(out.contains("font-weight=\"bold\""));
        assert!(out.contains("Courier New"));
    }

    #[test]
    fn test_label_subscript_becomes_tspan() {
        let out = render_string(&TextFragment::Label {
            prefix: String::from("length"),
            subscript: Some(String::from("1")),
        });
        assert!(out.contains("<tspan"));
        assert!(out.contains("length"));
        assert!(out.contains("dy=\"4\""));
    }

    #[test]
    fn test_rich_fragment_overrides_base_style() {
        let rich = TextFragment::Rich(RichText {
            style: RunStyle {
                font_size: Some(18.0),
                ..RunStyle::default()
            },
            items: vec![
                RichItem::Str(String::from("0000000c ")),
                RichItem::Span(TextRun {
                    content: String::from("(12)"),
                    style: RunStyle {
                        font_size: Some(16.0),
                        font_weight: Some(String::from("light")),
                        ..RunStyle::default()
                    },
                }),
            ],
        });
        let out = render_string(&rich);
        assert!(out.contains("font-size=\"18\""));
        assert!(out.contains("(12)"));
        assert!(out.contains("font-weight=\"light\""));
    }
}
