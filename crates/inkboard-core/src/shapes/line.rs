//! Straight segment payload, shared by lines and arrows.

use super::{
    CssColor, ShapeTrait, contains_inclusive, default_stroke_width, null_as_default,
    null_as_stroke_width,
};
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};

/// A straight segment from start to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineElement {
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_y: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_y: f64,
    /// Stroke color.
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: CssColor,
    /// Stroke width.
    #[serde(default = "default_stroke_width", deserialize_with = "null_as_stroke_width")]
    pub stroke_width: f64,
}

impl LineElement {
    /// Create a new segment.
    pub fn new(start: Point, end: Point, color: CssColor, stroke_width: f64) -> Self {
        Self {
            start_x: start.x,
            start_y: start.y,
            end_x: end.x,
            end_y: end.y,
            color,
            stroke_width,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }

    pub fn end(&self) -> Point {
        Point::new(self.end_x, self.end_y)
    }

    /// Move the end point, keeping the start fixed.
    pub fn set_end(&mut self, end: Point) {
        self.end_x = end.x;
        self.end_y = end.y;
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        self.start().distance(self.end())
    }
}

impl ShapeTrait for LineElement {
    fn bounds(&self) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    /// Tests against the endpoint box grown by `tolerance`, not the segment itself.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        contains_inclusive(self.bounds().inflate(tolerance, tolerance), point)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
    }

    fn color(&self) -> &CssColor {
        &self.color
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}
