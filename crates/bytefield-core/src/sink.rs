//! Emission-ordered accumulation of SVG elements.
//!
//! Drawing primitives append elements to an [`ElementSink`] in call order,
//! and the assembler serializes them in that same order. Later elements
//! paint over earlier ones; overlapping borders between adjacent boxes rely
//! on this to hide shared seams, so the sink never reorders.

use log::trace;

use crate::geometry::Bounds;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Collects emitted SVG nodes and the running diagram bounds.
#[derive(Default)]
pub struct ElementSink {
    nodes: Vec<SvgNode>,
    bounds: Bounds,
}

impl ElementSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and grows the bounds to the element's extent.
    ///
    /// Every emission reports its own extent; the sink has no notion of
    /// element geometry beyond that.
    pub fn emit(&mut self, node: SvgNode, max_x: f32, max_y: f32) {
        trace!(index = self.nodes.len(), max_x, max_y; "Emitting element");
        self.bounds.extend(max_x, max_y);
        self.nodes.push(node);
    }

    /// The bounds reached by all emissions so far.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consumes the sink, yielding nodes in emission order.
    pub fn into_nodes(self) -> Vec<SvgNode> {
        self.nodes
    }
}

impl std::fmt::Debug for ElementSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementSink")
            .field("nodes", &self.nodes.len())
            .field("bounds", &self.bounds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::Rectangle;

    #[test]
    fn test_emission_order_preserved() {
        let mut sink = ElementSink::new();
        sink.emit(Box::new(Rectangle::new().set("x", 0)), 40.0, 30.0);
        sink.emit(Box::new(Rectangle::new().set("x", 40)), 80.0, 30.0);

        let nodes = sink.into_nodes();
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].to_string().contains("x=\"0\""));
        assert!(nodes[1].to_string().contains("x=\"40\""));
    }

    #[test]
    fn test_bounds_track_every_emission() {
        let mut sink = ElementSink::new();
        sink.emit(Box::new(Rectangle::new()), 640.0, 30.0);
        sink.emit(Box::new(Rectangle::new()), 40.0, 90.0);
        assert_eq!(sink.bounds().max_x(), 640.0);
        assert_eq!(sink.bounds().max_y(), 90.0);
    }
}
