//! End-to-end tests driving the full parse, evaluate, and assemble
//! pipeline through the public API.

use bytefield::{BytefieldError, EvalError, Options, generate};

fn render(source: &str) -> String {
    generate(source, &Options::default()).expect("script should render")
}

fn eval_error(source: &str) -> EvalError {
    match generate(source, &Options::default()) {
        Err(BytefieldError::Eval { err, .. }) => err,
        Err(other) => panic!("expected evaluation error, got {other}"),
        Ok(_) => panic!("expected evaluation error, got output"),
    }
}

/// The `fill` attribute values of every `<rect>` element, in document order.
fn rect_fills(svg: &str) -> Vec<String> {
    svg.match_indices("<rect")
        .map(|(start, _)| {
            let tag = &svg[start..start + svg[start..].find('>').unwrap()];
            let fill = tag.find("fill=\"").map(|i| i + "fill=\"".len()).unwrap();
            tag[fill..fill + tag[fill..].find('"').unwrap()].to_owned()
        })
        .collect()
}

#[test]
fn test_rendering_is_deterministic() {
    let source = r##"
        (def green "#a0ffa0")
        (draw-column-headers)
        (draw-box :span 4 :text (hex-text "872349ae") :fill green)
        (draw-box :span 12 :text (plain-text "rest"))
        (next-row)
        (draw-bottom)
    "##;
    assert_eq!(render(source), render(source));
}

#[test]
fn test_bottom_only_draws_baseline_at_origin() {
    let svg = render("(draw-bottom)");
    assert!(svg.contains("<line"));
    assert!(svg.contains("y1=\"0\""));
    assert!(svg.contains("y2=\"0\""));
    // Full default row width: 40 + 16 * 40.
    assert!(svg.contains("x2=\"680\""));
}

#[test]
fn test_eight_boxes_with_alternating_fills() {
    let svg = render(
        r##"
        (def green "#a0ffa0")
        (def yellow "#ffffa0")
        (draw-column-headers)
        (draw-row-header "00")
        (doseq [offset [0 1 2 3]]
          (draw-box :text (hex-text "11") :fill green)
          (draw-box :text (hex-text "22") :fill yellow))
        (next-row)
        (draw-bottom)
    "##,
    );

    let fills = rect_fills(&svg);
    assert_eq!(fills.len(), 8);
    for pair in fills.chunks(2) {
        assert_eq!(pair[0], fills[0]);
        assert_eq!(pair[1], fills[1]);
    }
    assert_ne!(fills[0], fills[1]);

    // Each box advances by exactly one byte width.
    for column in 0..8 {
        let x = 40 + column * 40;
        assert!(svg.contains(&format!("x=\"{x}\"")), "missing box at x={x}");
    }

    // Column indexes are hex digits. Text content sits on its own line in
    // the serialized output.
    assert!(svg.contains("\nf\n"));
    assert!(!svg.contains("\n15\n"));
}

#[test]
fn test_row_overflow_aborts_with_no_output() {
    let err = eval_error(
        r##"
        (draw-box :span 4)
        (draw-box :span 14)
    "##,
    );
    assert!(matches!(
        err,
        EvalError::RowOverflow {
            column: 4,
            box_span: 14,
            row_width: 16,
            ..
        }
    ));
}

#[test]
fn test_huge_span_overflows_cleanly() {
    // A span near u32::MAX must raise the overflow error, not wrap the
    // column arithmetic and draw anyway.
    let err = eval_error("(draw-box)\n(draw-box :span 4294967295)");
    assert!(matches!(
        err,
        EvalError::RowOverflow {
            column: 1,
            box_span: u32::MAX,
            row_width: 16,
            ..
        }
    ));
}

#[test]
fn test_gap_then_bottom() {
    let svg = render("(draw-gap)\n(draw-bottom)");
    // Torn edges of the gap.
    assert!(svg.contains("stroke-dasharray"));
    // Baseline directly beneath one default row height.
    assert!(svg.contains("y1=\"30\""));
    assert!(svg.contains("y2=\"30\""));
}

#[test]
fn test_embedded_output_differs_only_by_declaration() {
    let source = "(draw-box :text (hex-text \"11\"))\n(draw-bottom)";
    let standalone = generate(source, &Options { embedded: false }).unwrap();
    let embedded = generate(source, &Options { embedded: true }).unwrap();
    assert_eq!(
        standalone,
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{embedded}")
    );
    assert!(embedded.starts_with("<svg"));
}

#[test]
fn test_adjacent_boxes_emit_in_call_order() {
    let svg = render(
        r##"
        (def purple "#e4b5f7")
        (draw-box :text (hex-text "06") :borders #{:left :top :bottom} :fill purple)
        (draw-box :text (hex-text "06") :borders #{:top :bottom} :fill purple)
        (next-row)
        (draw-bottom)
    "##,
    );
    // The first box's elements all precede the second box's.
    let first_rect = svg.find("x=\"40\"").unwrap();
    let second_rect = svg.find("x=\"80\"").unwrap();
    assert!(first_rect < second_rect);
}

#[test]
fn test_drawing_after_bottom_is_rejected() {
    let err = eval_error("(draw-bottom)\n(draw-box)");
    assert!(matches!(err, EvalError::AfterBottom { .. }));
}

#[test]
fn test_unbound_symbol_reported_with_name() {
    let err = eval_error("(draw-box :fill greeen)");
    assert!(matches!(err, EvalError::UnboundSymbol { .. }));
    assert!(err.to_string().contains("greeen"));
}

#[test]
fn test_closure_arity_mismatch() {
    let err = eval_error(
        r##"
        (defn field [label span] (draw-box :text (plain-text label) :span span))
        (field "flags")
    "##,
    );
    assert!(matches!(err, EvalError::ArityMismatch { actual: 1, .. }));
}

#[test]
fn test_defattrs_and_border_shorthands() {
    let svg = render(
        r##"
        (defattrs :bg-green {:fill "#a0ffa0"})
        (draw-box :text (hex-text "11") :attrs :bg-green)
        (draw-box :text (hex-text "22") :attrs [:bg-green :box-related])
        (next-row)
        (draw-bottom)
    "##,
    );
    let fills = rect_fills(&svg);
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0], fills[1]);

    // First box strokes four edges, the :box-related one only two, and the
    // closing baseline adds one more line.
    assert_eq!(svg.matches("<line").count(), 4 + 2 + 1);
}

#[test]
fn test_redefined_row_width_applies_before_first_draw() {
    let svg = render(
        r##"
        (def boxes-per-row 8)
        (draw-box :span 8)
        (next-row)
        (draw-bottom)
    "##,
    );
    // Baseline spans 40 + 8 * 40.
    assert!(svg.contains("x2=\"360\""));
}

#[test]
fn test_metrics_freeze_at_first_drawing_call() {
    let svg = render(
        r##"
        (draw-box)
        (def boxes-per-row 4)
        (draw-box :span 15)
        (next-row)
        (draw-bottom)
    "##,
    );
    // The redefinition after the first draw has no effect on this render.
    assert!(svg.contains("x2=\"680\""));
}

#[test]
fn test_group_label_header_row_with_custom_height() {
    let svg = render(
        r##"
        (draw-group-label-header 5 "start")
        (draw-group-label-header 11 "rest")
        (next-row :height 18)
        (draw-box :text (hex-text "11"))
        (next-row)
        (draw-bottom)
    "##,
    );
    assert!(svg.contains("start"));
    assert!(svg.contains("rest"));
    // The box row begins beneath the 18px header row: its top border line
    // sits at y = 18, and the baseline under 18 + 30.
    assert!(svg.contains("y1=\"18\""));
    assert!(svg.contains("y1=\"48\""));
}

#[test]
fn test_let_bindings_are_sequential_and_scoped() {
    let svg = render(
        r##"
        (let [base "#a0ffa0"
              accent base]
          (draw-box :fill accent))
        (next-row)
        (draw-bottom)
    "##,
    );
    assert_eq!(rect_fills(&svg).len(), 1);

    let err = eval_error(
        r##"
        (let [base "#a0ffa0"] (draw-box :fill base))
        (draw-box :fill base)
    "##,
    );
    assert!(matches!(err, EvalError::UnboundSymbol { .. }));
}

#[test]
fn test_rich_text_caption() {
    let svg = render(
        r##"
        (draw-box :span 4 :text (svg/text {:font-size 18
                                           :font-family hex-family}
                                          "0000000c "
                                          (svg/tspan {:font-size 16
                                                      :font-weight "light"}
                                                     "(12)")))
        (next-row)
        (draw-bottom)
    "##,
    );
    assert!(svg.contains("<tspan"));
    assert!(svg.contains("(12)"));
    assert!(svg.contains("font-weight=\"light\""));
    assert!(svg.contains("Courier New"));
}

#[test]
fn test_label_text_subscript() {
    let svg = render(
        r##"
        (draw-box :span 4 :text (label-text "length" "1"))
        (next-row)
        (draw-bottom)
    "##,
    );
    assert!(svg.contains("length"));
    assert!(svg.contains("<tspan"));
    assert!(svg.contains("dy=\"4\""));
}

#[test]
fn test_non_positive_row_height_is_rejected() {
    let err = eval_error("(draw-box)\n(next-row :height 0)");
    assert!(matches!(err, EvalError::MalformedForm { .. }));
    assert!(err.to_string().contains("positive"));

    let err = eval_error("(draw-box)\n(next-row :height -18)");
    assert!(matches!(err, EvalError::MalformedForm { .. }));
}

#[test]
fn test_unknown_option_is_an_error() {
    let err = eval_error("(draw-box :spam 4)");
    assert!(matches!(err, EvalError::UnknownOption { .. }));
    assert!(err.to_string().contains(":spam"));
}

#[test]
fn test_invalid_fill_color() {
    let err = eval_error("(draw-box :fill \"not-a-color\")");
    assert!(matches!(err, EvalError::InvalidColor { .. }));
}

#[test]
fn test_parse_error_surfaces_as_parse_variant() {
    let result = generate("(draw-box :span 4", &Options::default());
    assert!(matches!(result, Err(BytefieldError::Parse { .. })));
}

#[test]
fn test_empty_source_renders_empty_canvas() {
    let svg = render("");
    assert!(svg.contains("<svg"));
    assert!(svg.contains("width=\"1\""));
}

#[test]
fn test_hex_text_digit_count() {
    let svg = render(
        r##"
        (draw-box :span 4 :text (hex-text 12 8))
        (next-row)
        (draw-bottom)
    "##,
    );
    assert!(svg.contains("0000000c"));
}
