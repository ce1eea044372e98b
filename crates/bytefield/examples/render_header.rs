//! Renders a small packet-header diagram to standard output.
//!
//! Run with: `cargo run --example render_header -p bytefield`

fn main() {
    let source = r##"
        (def header "#ffffa0")
        (draw-column-headers)
        (draw-row-header "00")
        (draw-box :span 2 :text (label-text "magic") :fill header)
        (draw-box :span 2 :text (label-text "version") :fill header)
        (draw-box :span 4 :text (label-text "length"))
        (draw-box :span 8 :text (plain-text "payload"))
        (next-row)
        (draw-bottom)
    "##;

    match bytefield::generate(source, &bytefield::Options::default()) {
        Ok(svg) => println!("{svg}"),
        Err(err) => eprintln!("render failed: {err}"),
    }
}
