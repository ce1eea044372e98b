//! Reusable style mappings for boxes.
//!
//! An [`AttrSet`] is the resolved form of the `defattrs` literals and inline
//! style maps a script applies to a box: fill color, which box edges get a
//! stroke, and font overrides for the caption. Attribute sets compose with
//! later entries overriding earlier ones, property by property.

use crate::color::Color;

/// The set of box edges that receive a stroke.
///
/// Adjacent boxes share edges; omitting the shared edge on one of them is
/// how scripts avoid double-stroked seams between related boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSet {
    left: bool,
    right: bool,
    top: bool,
    bottom: bool,
}

impl Default for EdgeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl EdgeSet {
    /// All four edges stroked. The default for a standalone box.
    pub fn all() -> Self {
        Self {
            left: true,
            right: true,
            top: true,
            bottom: true,
        }
    }

    /// No edges stroked.
    pub fn none() -> Self {
        Self {
            left: false,
            right: false,
            top: false,
            bottom: false,
        }
    }

    /// Builds an edge set from `:left` / `:right` / `:top` / `:bottom`
    /// keyword names. Unknown names are rejected.
    pub fn from_names<'a, I>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut edges = Self::none();
        for name in names {
            match name {
                "left" => edges.left = true,
                "right" => edges.right = true,
                "top" => edges.top = true,
                "bottom" => edges.bottom = true,
                other => return Err(format!("unknown border edge ':{other}'")),
            }
        }
        Ok(edges)
    }

    pub fn left(self) -> bool {
        self.left
    }

    pub fn right(self) -> bool {
        self.right
    }

    pub fn top(self) -> bool {
        self.top
    }

    pub fn bottom(self) -> bool {
        self.bottom
    }
}

/// A composable style mapping for one box.
///
/// Every property is optional; merging applies later-set properties over
/// earlier ones without touching properties the later set leaves out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrSet {
    fill: Option<Color>,
    borders: Option<EdgeSet>,
    font_weight: Option<String>,
    font_size: Option<f32>,
    font_family: Option<String>,
}

impl AttrSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set that only constrains the stroked edges. Used for the pre-bound
    /// border shorthands (`:box-first`, `:box-related`, ...).
    pub fn with_borders(borders: EdgeSet) -> Self {
        Self {
            borders: Some(borders),
            ..Self::default()
        }
    }

    pub fn set_fill(&mut self, fill: Color) {
        self.fill = Some(fill);
    }

    pub fn set_borders(&mut self, borders: EdgeSet) {
        self.borders = Some(borders);
    }

    pub fn set_font_weight(&mut self, weight: String) {
        self.font_weight = Some(weight);
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = Some(size);
    }

    pub fn set_font_family(&mut self, family: String) {
        self.font_family = Some(family);
    }

    pub fn fill(&self) -> Option<&Color> {
        self.fill.as_ref()
    }

    /// The stroked edges, defaulting to all four when unset.
    pub fn borders(&self) -> EdgeSet {
        self.borders.unwrap_or_default()
    }

    pub fn font_weight(&self) -> Option<&str> {
        self.font_weight.as_deref()
    }

    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn font_family(&self) -> Option<&str> {
        self.font_family.as_deref()
    }

    /// Overrides this set's properties with the ones `other` sets.
    ///
    /// Properties `other` leaves unset are untouched, so applying
    /// `{:fill green}` after `{:borders #{:top}}` keeps the border subset.
    pub fn merge_from(&mut self, other: &AttrSet) {
        if let Some(fill) = &other.fill {
            self.fill = Some(fill.clone());
        }
        if let Some(borders) = other.borders {
            self.borders = Some(borders);
        }
        if let Some(weight) = &other.font_weight {
            self.font_weight = Some(weight.clone());
        }
        if let Some(size) = other.font_size {
            self.font_size = Some(size);
        }
        if let Some(family) = &other.font_family {
            self.font_family = Some(family.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_set_from_names() {
        let edges = EdgeSet::from_names(["left", "top", "bottom"]).unwrap();
        assert!(edges.left());
        assert!(!edges.right());
        assert!(edges.top());
        assert!(edges.bottom());
    }

    #[test]
    fn test_edge_set_rejects_unknown_name() {
        assert!(EdgeSet::from_names(["diagonal"]).is_err());
    }

    #[test]
    fn test_merge_is_override_only() {
        let mut base = AttrSet::new();
        base.set_borders(EdgeSet::from_names(["top", "bottom"]).unwrap());

        let mut over = AttrSet::new();
        over.set_fill(Color::new("#a0ffa0").unwrap());

        base.merge_from(&over);
        assert_eq!(base.fill(), Some(&Color::new("#a0ffa0").unwrap()));
        // The border subset from the earlier set survives.
        assert!(!base.borders().left());
        assert!(base.borders().top());
    }

    #[test]
    fn test_later_fill_wins() {
        let mut base = AttrSet::new();
        base.set_fill(Color::new("#ffffa0").unwrap());

        let mut over = AttrSet::new();
        over.set_fill(Color::new("#ffb0a0").unwrap());

        base.merge_from(&over);
        assert_eq!(base.fill(), Some(&Color::new("#ffb0a0").unwrap()));
    }
}
