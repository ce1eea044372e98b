//! SVG document assembly.
//!
//! Serialization order matches emission order; the assembler never sorts
//! or groups elements, since later elements are meant to paint over
//! earlier ones.

use bytefield_core::sink::ElementSink;
use log::info;
use svg::Document;

/// Padding added around the diagram bounds so strokes on the outermost
/// edges are not clipped by the viewport.
const CANVAS_PADDING: f32 = 1.0;

/// Serializes the accumulated elements to SVG text.
///
/// With `embedded` set, the result is a bare `<svg>` element without an
/// XML declaration, ready to be inlined in a host document. Otherwise a
/// standalone document with an XML declaration and namespace is produced.
pub fn render(sink: ElementSink, embedded: bool) -> String {
    let bounds = sink.bounds();
    let width = bounds.max_x() + CANVAS_PADDING;
    let height = bounds.max_y() + CANVAS_PADDING;
    let view_box = format!("0 0 {width} {height}");
    info!(width, height, elements = sink.len(), embedded; "Assembling document");

    let mut document = Document::new()
        .set("width", width)
        .set("height", height)
        .set("viewBox", view_box);
    for node in sink.into_nodes() {
        document = document.add(node);
    }

    if embedded {
        document.to_string()
    } else {
        format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{document}")
    }
}

#[cfg(test)]
mod tests {
    use svg::node::element::Rectangle;

    use super::*;

    fn sink_with_rect() -> ElementSink {
        let mut sink = ElementSink::new();
        sink.emit(Box::new(Rectangle::new().set("x", 40)), 80.0, 30.0);
        sink
    }

    #[test]
    fn test_standalone_document_has_declaration_and_namespace() {
        let out = render(sink_with_rect(), false);
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(out.contains("viewBox=\"0 0 81 31\""));
    }

    #[test]
    fn test_embedded_output_is_bare_svg() {
        let out = render(sink_with_rect(), true);
        assert!(out.starts_with("<svg"));
        assert!(!out.contains("<?xml"));
        assert!(out.contains("width=\"81\""));
        assert!(out.contains("height=\"31\""));
    }

    #[test]
    fn test_elements_serialize_in_emission_order() {
        let mut sink = ElementSink::new();
        sink.emit(Box::new(Rectangle::new().set("x", 0)), 40.0, 30.0);
        sink.emit(Box::new(Rectangle::new().set("x", 40)), 80.0, 30.0);
        let out = render(sink, true);
        let first = out.find("x=\"0\"").unwrap();
        let second = out.find("x=\"40\"").unwrap();
        assert!(first < second);
    }
}
