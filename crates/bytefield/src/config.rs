//! Generation options and configurable layout metrics.

use serde::Deserialize;

fn default_box_width() -> f32 {
    40.0
}

fn default_row_height() -> f32 {
    30.0
}

fn default_left_margin() -> f32 {
    40.0
}

fn default_boxes_per_row() -> u32 {
    16
}

fn default_column_header_height() -> f32 {
    14.0
}

/// Initial layout metrics for a render.
///
/// These seed the symbols `box-width`, `row-height`, `left-margin` and
/// `boxes-per-row` in the script's root environment; a script may redefine
/// any of them with `def` before the first drawing call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Metrics {
    #[serde(default = "default_box_width")]
    box_width: f32,
    #[serde(default = "default_row_height")]
    row_height: f32,
    #[serde(default = "default_left_margin")]
    left_margin: f32,
    #[serde(default = "default_boxes_per_row")]
    boxes_per_row: u32,
    #[serde(default = "default_column_header_height")]
    column_header_height: f32,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            box_width: default_box_width(),
            row_height: default_row_height(),
            left_margin: default_left_margin(),
            boxes_per_row: default_boxes_per_row(),
            column_header_height: default_column_header_height(),
        }
    }
}

impl Metrics {
    pub fn box_width(&self) -> f32 {
        self.box_width
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn left_margin(&self) -> f32 {
        self.left_margin
    }

    pub fn boxes_per_row(&self) -> u32 {
        self.boxes_per_row
    }

    pub fn column_header_height(&self) -> f32 {
        self.column_header_height
    }
}

/// Per-call generation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Emit a bare `<svg>` element suitable for inlining in a host document
    /// instead of a standalone SVG file with an XML declaration.
    pub embedded: bool,
}

/// Full generator configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    metrics: Metrics,
}

impl AppConfig {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
