//! Stateful two-dimensional diagram layout.
//!
//! The layout engine tracks a cursor over a fixed-width grid of byte
//! columns. Boxes fill columns left to right; rows are closed explicitly
//! with `next-row` (or implicitly never: the script decides). All emission
//! goes through the [`ElementSink`] in call order, which is what lets
//! adjacent boxes hide their shared seams.

use bytefield_core::{
    attrs::AttrSet,
    geometry::{Bounds, Point},
    sink::ElementSink,
    text::{FontConfig, TextFragment},
};
use log::debug;
use svg::{
    Node as _,
    node::element::{Line, Path, Rectangle, Text, path::Data},
};

use crate::config::Metrics;

/// Stroke color for box borders and rules.
const STROKE: &str = "#000000";
/// Font size for column, row, and group header labels.
const HEADER_FONT_SIZE: f32 = 11.0;
/// Dash pattern for the torn edges of a gap.
const GAP_DASH: &str = "5,5";

/// Metrics frozen at the first drawing call.
///
/// Scripts may redefine `boxes-per-row` and friends with `def`, but only
/// until something is drawn; a single render never mixes grids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMetrics {
    pub box_width: f32,
    pub row_height: f32,
    pub left_margin: f32,
    pub boxes_per_row: u32,
    pub column_header_height: f32,
}

impl ResolvedMetrics {
    /// Left edge of the given byte column.
    fn column_x(&self, column: u32) -> f32 {
        self.left_margin + column as f32 * self.box_width
    }

    /// Right edge of the full row.
    fn row_right(&self) -> f32 {
        self.column_x(self.boxes_per_row)
    }
}

impl From<&Metrics> for ResolvedMetrics {
    fn from(metrics: &Metrics) -> Self {
        Self {
            box_width: metrics.box_width(),
            row_height: metrics.row_height(),
            left_margin: metrics.left_margin(),
            boxes_per_row: metrics.boxes_per_row(),
            column_header_height: metrics.column_header_height(),
        }
    }
}

/// A drawing call that violates the layout rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutViolation {
    /// A box would extend past the right edge of the row.
    BoxOverflow {
        column: u32,
        box_span: u32,
        row_width: u32,
    },
    /// A group label header would extend past the right edge of the row.
    HeaderOverflow {
        column: u32,
        box_span: u32,
        row_width: u32,
    },
    /// Drawing was attempted after `draw-bottom`.
    Finished,
}

/// The mutable layout cursor and its element sink.
#[derive(Debug)]
pub struct LayoutState {
    sink: ElementSink,
    fonts: FontConfig,
    /// Next free byte column for boxes in the open row.
    column: u32,
    /// Next free byte column for group label headers. Headers advance
    /// independently of boxes so a label row can sit above drawn boxes.
    header_column: u32,
    /// Top edge of the open row.
    row_top: f32,
    finished: bool,
}

impl LayoutState {
    pub fn new(fonts: FontConfig) -> Self {
        Self {
            sink: ElementSink::new(),
            fonts,
            column: 0,
            header_column: 0,
            row_top: 0.0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn bounds(&self) -> Bounds {
        self.sink.bounds()
    }

    pub fn into_sink(self) -> ElementSink {
        self.sink
    }

    fn ensure_open(&self) -> Result<(), LayoutViolation> {
        if self.finished {
            Err(LayoutViolation::Finished)
        } else {
            Ok(())
        }
    }

    /// Draws the byte column indexes, in hex, across the top of the diagram
    /// and advances the cursor below them.
    pub fn draw_column_headers(&mut self, m: &ResolvedMetrics) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        let y = self.row_top + m.column_header_height / 2.0;
        for column in 0..m.boxes_per_row {
            let x = m.column_x(column) + m.box_width / 2.0;
            let text = Text::new(format!("{column:x}"))
                .set("x", x)
                .set("y", y)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "middle")
                .set("font-size", HEADER_FONT_SIZE)
                .set("font-family", self.fonts.hex_family.as_str());
            self.sink.emit(
                Box::new(text),
                m.column_x(column + 1),
                self.row_top + m.column_header_height,
            );
        }
        self.row_top += m.column_header_height;
        debug!(row_top = self.row_top; "Drew column headers");
        Ok(())
    }

    /// Draws a bracketed group label spanning `box_span` columns.
    ///
    /// Successive calls pack left to right on an independent cursor; the
    /// caller closes the header row with `next-row`.
    pub fn draw_group_label_header(
        &mut self,
        m: &ResolvedMetrics,
        box_span: u32,
        label: &str,
    ) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        // Compared this way round so an enormous span cannot overflow the
        // addition; the cursor never exceeds the row width.
        if box_span > m.boxes_per_row - self.header_column {
            return Err(LayoutViolation::HeaderOverflow {
                column: self.header_column,
                box_span,
                row_width: m.boxes_per_row,
            });
        }

        let x0 = m.column_x(self.header_column);
        let x1 = m.column_x(self.header_column + box_span);
        let bracket_y = self.row_top + 14.0;

        let text = Text::new(label)
            .set("x", (x0 + x1) / 2.0)
            .set("y", self.row_top + 9.0)
            .set("text-anchor", "middle")
            .set("dominant-baseline", "middle")
            .set("font-size", HEADER_FONT_SIZE)
            .set("font-family", self.fonts.serif_family.as_str());
        self.sink.emit(Box::new(text), x1, bracket_y);

        let bracket = Data::new()
            .move_to((x0 + 1.0, bracket_y - 4.0))
            .line_to((x0 + 1.0, bracket_y))
            .line_to((x1 - 1.0, bracket_y))
            .line_to((x1 - 1.0, bracket_y - 4.0));
        let path = Path::new()
            .set("d", bracket)
            .set("fill", "none")
            .set("stroke", STROKE)
            .set("stroke-width", 1);
        self.sink.emit(Box::new(path), x1, bracket_y);

        self.header_column += box_span;
        Ok(())
    }

    /// Draws a right-aligned address label in the left margin of the open
    /// row. Does not move the cursor.
    ///
    /// The label is centered on the default row height; the eventual height
    /// of the row is not known until `next-row` closes it. Rows with a
    /// custom height (header label lines) carry their own labels instead of
    /// a gutter address.
    pub fn draw_row_header(
        &mut self,
        m: &ResolvedMetrics,
        label: &str,
    ) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        let text = Text::new(label)
            .set("x", m.left_margin - 6.0)
            .set("y", self.row_top + m.row_height / 2.0)
            .set("text-anchor", "end")
            .set("dominant-baseline", "middle")
            .set("font-size", HEADER_FONT_SIZE)
            .set("font-family", self.fonts.hex_family.as_str());
        self.sink
            .emit(Box::new(text), m.left_margin, self.row_top + m.row_height / 2.0);
        Ok(())
    }

    /// Draws one box: optional fill, the selected borders, then the caption.
    ///
    /// That order is load-bearing. The caption paints over the borders and
    /// the borders over the fill, and a box that suppresses an edge leaves
    /// the neighbour's stroke visible instead of doubling it.
    pub fn draw_box(
        &mut self,
        m: &ResolvedMetrics,
        caption: Option<&TextFragment>,
        box_span: u32,
        attrs: &AttrSet,
    ) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        if box_span > m.boxes_per_row - self.column {
            return Err(LayoutViolation::BoxOverflow {
                column: self.column,
                box_span,
                row_width: m.boxes_per_row,
            });
        }

        let x = m.column_x(self.column);
        let width = box_span as f32 * m.box_width;
        let y = self.row_top;
        let height = m.row_height;
        let right = x + width;
        let bottom = y + height;

        if let Some(fill) = attrs.fill() {
            let rect = Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set("width", width)
                .set("height", height)
                .set("fill", fill);
            self.sink.emit(Box::new(rect), right, bottom);
        }

        let borders = attrs.borders();
        let edges = [
            (borders.left(), x, y, x, bottom),
            (borders.right(), right, y, right, bottom),
            (borders.top(), x, y, right, y),
            (borders.bottom(), x, bottom, right, bottom),
        ];
        for (stroked, x1, y1, x2, y2) in edges {
            if stroked {
                let line = Line::new()
                    .set("x1", x1)
                    .set("y1", y1)
                    .set("x2", x2)
                    .set("y2", y2)
                    .set("stroke", STROKE)
                    .set("stroke-width", 1);
                self.sink.emit(Box::new(line), x2.max(x1), y2.max(y1));
            }
        }

        if let Some(caption) = caption {
            let center = Point::new(x + width / 2.0, y + height / 2.0);
            let mut text = caption.render(center, &self.fonts);
            if let Some(weight) = attrs.font_weight() {
                text.assign("font-weight", weight);
            }
            if let Some(size) = attrs.font_size() {
                text.assign("font-size", size);
            }
            if let Some(family) = attrs.font_family() {
                text.assign("font-family", family);
            }
            self.sink.emit(Box::new(text), right, bottom);
        }

        self.column += box_span;
        debug!(column = self.column, box_span; "Drew box");
        Ok(())
    }

    /// Closes the open row, moving the cursor down by `height` (default:
    /// the resolved row height) and back to column zero.
    pub fn next_row(
        &mut self,
        m: &ResolvedMetrics,
        height: Option<f32>,
    ) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        self.row_top += height.unwrap_or(m.row_height);
        self.column = 0;
        self.header_column = 0;
        debug!(row_top = self.row_top; "Advanced to next row");
        Ok(())
    }

    /// Draws a torn-edge gap spanning the full row width and one row height,
    /// marking elided content between two regions of the diagram.
    pub fn draw_gap(&mut self, m: &ResolvedMetrics) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        let x0 = m.column_x(0);
        let x1 = m.row_right();
        let y = self.row_top;
        let height = m.row_height;

        for x in [x0, x1] {
            let edge = Line::new()
                .set("x1", x)
                .set("y1", y)
                .set("x2", x)
                .set("y2", y + height)
                .set("stroke", STROKE)
                .set("stroke-width", 1);
            self.sink.emit(Box::new(edge), x, y + height);
        }
        for tear_y in [y + height / 3.0, y + height * 2.0 / 3.0] {
            let tear = Line::new()
                .set("x1", x0)
                .set("y1", tear_y)
                .set("x2", x1)
                .set("y2", tear_y)
                .set("stroke", STROKE)
                .set("stroke-width", 1)
                .set("stroke-dasharray", GAP_DASH);
            self.sink.emit(Box::new(tear), x1, tear_y);
        }

        self.row_top += height;
        self.column = 0;
        self.header_column = 0;
        Ok(())
    }

    /// Draws the closing baseline across the full row width and finishes
    /// the diagram. Any later drawing call is an error.
    pub fn draw_bottom(&mut self, m: &ResolvedMetrics) -> Result<(), LayoutViolation> {
        self.ensure_open()?;
        let line = Line::new()
            .set("x1", m.column_x(0))
            .set("y1", self.row_top)
            .set("x2", m.row_right())
            .set("y2", self.row_top)
            .set("stroke", STROKE)
            .set("stroke-width", 1);
        self.sink.emit(Box::new(line), m.row_right(), self.row_top);
        self.finished = true;
        debug!(row_top = self.row_top; "Drew bottom baseline");
        Ok(())
    }
}
