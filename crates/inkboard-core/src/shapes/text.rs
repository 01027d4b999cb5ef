//! Text shape.

use super::{
    CssColor, DEFAULT_FONT_SIZE, ShapeTrait, contains_inclusive, default_font_size,
    null_as_default, null_as_font_size,
};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Approximate glyph advance as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// A single line of text anchored at its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    /// Baseline start.
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    /// Fill color for the glyphs.
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: CssColor,
    #[serde(default = "default_font_size", deserialize_with = "null_as_font_size")]
    pub font_size: f64,
    /// Carried for round-trips; text is never stroked.
    #[serde(default, deserialize_with = "null_as_default")]
    pub stroke_width: f64,
}

impl TextElement {
    pub fn new(anchor: Point, text: String, color: CssColor, font_size: f64) -> Self {
        Self {
            x: anchor.x,
            y: anchor.y,
            text,
            color,
            font_size,
            stroke_width: 0.0,
        }
    }

    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Font size used for layout; zero or negative sizes fall back to the default.
    pub fn effective_font_size(&self) -> f64 {
        if self.font_size > 0.0 {
            self.font_size
        } else {
            DEFAULT_FONT_SIZE
        }
    }

    /// Estimated advance width, counted in characters rather than shaped glyphs.
    pub fn approx_width(&self) -> f64 {
        self.text.chars().count() as f64 * self.effective_font_size() * CHAR_WIDTH_FACTOR
    }
}

impl ShapeTrait for TextElement {
    /// From one font size above the baseline down to the baseline.
    fn bounds(&self) -> Rect {
        let size = self.effective_font_size();
        Rect::new(self.x, self.y - size, self.x + self.approx_width(), self.y)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        contains_inclusive(self.bounds().inflate(tolerance, tolerance), point)
    }

    /// The estimated box; glyph outlines come from the renderer.
    fn to_path(&self) -> BezPath {
        self.bounds().to_path(0.1)
    }

    fn color(&self) -> &CssColor {
        &self.color
    }

    fn stroke_width(&self) -> f64 {
        self.stroke_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str, size: f64) -> TextElement {
        TextElement::new(Point::new(10.0, 100.0), s.to_string(), CssColor::black(), size)
    }

    #[test]
    fn test_bounds_estimate() {
        let t = text("hello", 20.0);
        let bounds = t.bounds();
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 80.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 70.0).abs() < 1e-9);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_baseline_box() {
        let t = text("hello", 20.0);
        assert!(t.hit_test(Point::new(40.0, 90.0), 0.0));
        assert!(t.hit_test(Point::new(10.0, 100.0), 0.0));
        // Descenders below the baseline are not part of the box.
        assert!(!t.hit_test(Point::new(40.0, 101.0), 0.0));
        assert!(!t.hit_test(Point::new(71.0, 90.0), 0.0));
    }

    #[test]
    fn test_width_counts_chars() {
        let t = text("héllo", 10.0);
        assert!((t.approx_width() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_font_size_falls_back() {
        let t = text("ab", 0.0);
        assert!((t.effective_font_size() - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
        assert!((t.bounds().height() - DEFAULT_FONT_SIZE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stroke_width_defaults_to_zero() {
        let t: TextElement = serde_json::from_str(r#"{"x":1,"y":2,"text":"a"}"#).unwrap();
        assert!(t.stroke_width.abs() < f64::EPSILON);
        assert!((t.font_size - 20.0).abs() < f64::EPSILON);
    }
}
