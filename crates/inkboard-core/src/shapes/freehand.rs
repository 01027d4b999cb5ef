//! Freehand pen stroke.

use super::{
    CssColor, ShapeTrait, default_stroke_width, null_as_default, null_as_stroke_width,
};
use kurbo::{BezPath, Circle, Point, Rect};
use serde::{Deserialize, Serialize};

/// A pen stroke: an open polyline through its points in drawing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElement {
    /// Points in the stroke, in the order they were drawn.
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: Vec<Point>,
    /// Stroke color.
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: CssColor,
    /// Stroke width.
    #[serde(default = "default_stroke_width", deserialize_with = "null_as_stroke_width")]
    pub stroke_width: f64,
}

impl PathElement {
    /// Start a stroke at a single point.
    pub fn new(start: Point, color: CssColor, stroke_width: f64) -> Self {
        Self::from_points(vec![start], color, stroke_width)
    }

    /// Create from existing points.
    pub fn from_points(points: Vec<Point>, color: CssColor, stroke_width: f64) -> Self {
        Self {
            points,
            color,
            stroke_width,
        }
    }

    /// Add a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A stroke that never moved (a click) strokes to zero area; it paints
    /// as a round dot one stroke width across instead.
    pub fn dot(&self) -> Option<Circle> {
        let first = *self.points.first()?;
        if self.stroke_width <= 0.0 || self.points.iter().any(|p| *p != first) {
            return None;
        }
        Some(Circle::new(first, self.stroke_width / 2.0))
    }
}

impl ShapeTrait for PathElement {
    fn bounds(&self) -> Rect {
        if self.points.is_empty() {
            return Rect::ZERO;
        }

        let mut min_x = f64::MAX;
        let mut min_y = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_y = f64::MIN;

        for point in &self.points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }

        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Vertex proximity only: a pointer between two distant samples misses.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.points.iter().any(|p| p.distance(point) < tolerance)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();

        let Some(first) = self.points.first() else {
            return path;
        };

        path.move_to(*first);
        for point in self.points.iter().skip(1) {
            path.line_to(*point);
        }

        path
    }

    fn color(&self) -> &CssColor {
        &self.color
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}
