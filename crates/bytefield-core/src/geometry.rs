//! Basic geometric types for diagram layout.

/// A point in diagram pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

}

/// An axis-aligned bounding rectangle anchored at the origin.
///
/// The diagram grows down and to the right from `(0, 0)`; bounds only track
/// the maximum extent reached by emitted elements. Row headers and group
/// header content never extend past the origin because the left margin is
/// part of the coordinate system.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    pub fn new(max_x: f32, max_y: f32) -> Self {
        Self { max_x, max_y }
    }

    /// Returns the rightmost extent reached so far.
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the bottommost extent reached so far.
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Grows the bounds to include the given coordinate.
    pub fn extend(&mut self, x: f32, y: f32) {
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Returns a new bounds covering both this and the other bounds.
    pub fn merge(self, other: Bounds) -> Self {
        Self {
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}
