//! Rectangle and circle payload.

use super::{
    CssColor, ShapeTrait, contains_inclusive, default_stroke_width, null_as_default,
    null_as_stroke_width,
};
use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// An axis-aligned box. Width and height keep their sign as drawn, so a
/// box dragged up and to the left has negative extents.
///
/// Circles reuse this payload and render as the ellipse inscribed in the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectElement {
    /// Anchor corner (where the drag started).
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,
    /// Signed width.
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: f64,
    /// Signed height.
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: f64,
    /// Stroke color.
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: CssColor,
    /// Fill color. Absent and `transparent` both mean no fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<CssColor>,
    /// Stroke width.
    #[serde(default = "default_stroke_width", deserialize_with = "null_as_stroke_width")]
    pub stroke_width: f64,
}

impl RectElement {
    /// Create a new box anchored at `origin`.
    pub fn new(
        origin: Point,
        width: f64,
        height: f64,
        color: CssColor,
        fill_color: Option<CssColor>,
        stroke_width: f64,
    ) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width,
            height,
            color,
            fill_color,
            stroke_width,
        }
    }

    /// The anchor corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Stretch the box so its far corner sits at `corner`.
    pub fn set_corner(&mut self, corner: Point) {
        self.width = corner.x - self.x;
        self.height = corner.y - self.y;
    }

    /// The box as a normalized kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }

    /// Parsed fill, `None` when absent, transparent or unparseable.
    pub fn fill(&self) -> Option<Color> {
        let fill = self.fill_color.as_ref()?;
        if fill.is_transparent() {
            return None;
        }
        fill.to_color()
    }

    /// Outline of the ellipse inscribed in the box.
    pub fn to_ellipse_path(&self) -> BezPath {
        Ellipse::from_rect(self.as_rect()).to_path(0.1)
    }
}

impl ShapeTrait for RectElement {
    fn bounds(&self) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        contains_inclusive(self.as_rect().inflate(tolerance, tolerance), point)
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn color(&self) -> &CssColor {
        &self.color
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}
