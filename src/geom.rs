#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::Sub;

use serde::{Deserialize, Serialize};

/// A point in canvas-local CSS pixels (origin at the canvas top-left).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Width and height in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `pt` lies inside `[0, width] × [0, height]`.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= 0.0 && pt.y >= 0.0 && pt.x <= self.width && pt.y <= self.height
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

/// Clamp one axis so that `[value, value + extent]` fits in `[0, limit]`.
///
/// When the extent exceeds the limit the lower bound wins and the result is 0.
#[must_use]
pub fn clamp_axis(value: f64, extent: f64, limit: f64) -> f64 {
    value.min(limit - extent).max(0.0)
}

/// Clamp a top-left position so a box of `size` stays inside `bounds`.
#[must_use]
pub fn clamp_into(pos: Point, size: Size, bounds: Size) -> Point {
    Point {
        x: clamp_axis(pos.x, size.width, bounds.width),
        y: clamp_axis(pos.y, size.height, bounds.height),
    }
}
