//! Drawable element definitions for the annotation canvas.

mod arrow;
mod freehand;
mod line;
mod rectangle;
mod text;

pub use arrow::{ARROW_HEAD_ANGLE, arrow_head_length, arrow_wings};
pub use freehand::PathElement;
pub use line::LineElement;
pub use rectangle::RectElement;
pub use text::TextElement;

use kurbo::{BezPath, Point, Rect, Shape as _};
use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Deserializer, Serialize};

/// Eraser reach (in scene units) for paths, lines and arrows.
pub const ERASER_TOLERANCE: f64 = 10.0;

/// Default stroke width for elements that omit it.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Default font size for text elements that omit it.
pub const DEFAULT_FONT_SIZE: f64 = 20.0;

/// A CSS color string, kept verbatim so documents round-trip unchanged.
///
/// Parsing to a [`Color`] happens on demand when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CssColor(String);

impl CssColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn black() -> Self {
        Self::new("#000000")
    }

    /// The "no fill" sentinel.
    pub fn transparent() -> Self {
        Self::new("transparent")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the CSS string. Returns `None` for anything `parse_color` rejects.
    pub fn to_color(&self) -> Option<Color> {
        parse_color(self.0.trim())
            .ok()
            .map(|c| c.to_alpha_color::<Srgb>())
    }

    /// True for the `transparent` keyword and for any fully transparent color.
    pub fn is_transparent(&self) -> bool {
        if self.0.trim().eq_ignore_ascii_case("transparent") {
            return true;
        }
        self.to_color().is_some_and(|c| c.components[3] <= 0.0)
    }
}

impl Default for CssColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<&str> for CssColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

pub(crate) fn default_stroke_width() -> f64 {
    DEFAULT_STROKE_WIDTH
}

pub(crate) fn default_font_size() -> f64 {
    DEFAULT_FONT_SIZE
}

// Explicit `null` reads like an absent field. Clients serialize NaN numbers
// and cleared inputs as `null`.

pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn null_as_stroke_width<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(|v| v.unwrap_or(DEFAULT_STROKE_WIDTH))
}

pub(crate) fn null_as_font_size<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(|v| v.unwrap_or(DEFAULT_FONT_SIZE))
}

/// Decode raw JSON entries into elements, skipping any that do not decode
/// (unknown `type`, wrong field types).
pub fn decode_elements(values: Vec<serde_json::Value>) -> Vec<Element> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Element>(value) {
            Ok(element) => Some(element),
            Err(e) => {
                log::warn!("Skipping unreadable element: {}", e);
                None
            }
        })
        .collect()
}

/// Point-in-rectangle test that includes all four edges.
pub(crate) fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Common trait for all element payloads.
pub trait ShapeTrait {
    /// Axis-aligned bounds in scene coordinates, normalized so x0 <= x1 and y0 <= y1.
    fn bounds(&self) -> Rect;

    /// Check if a scene point hits this element within `tolerance`.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Geometry for rendering, in scene coordinates.
    fn to_path(&self) -> BezPath;

    /// Stroke (or text) color as written.
    fn color(&self) -> &CssColor;

    fn stroke_width(&self) -> f64;
}

/// A drawable element, tagged by `type` on the wire.
///
/// Rect and circle share a bounding-box payload; line and arrow share a segment payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Path(PathElement),
    Rect(RectElement),
    Circle(RectElement),
    Line(LineElement),
    Arrow(LineElement),
    Text(TextElement),
}

impl Element {
    fn shape(&self) -> &dyn ShapeTrait {
        match self {
            Element::Path(s) => s as &dyn ShapeTrait,
            Element::Rect(s) | Element::Circle(s) => s as &dyn ShapeTrait,
            Element::Line(s) | Element::Arrow(s) => s as &dyn ShapeTrait,
            Element::Text(s) => s as &dyn ShapeTrait,
        }
    }

    /// The wire tag for this element.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Path(_) => "path",
            Element::Rect(_) => "rect",
            Element::Circle(_) => "circle",
            Element::Line(_) => "line",
            Element::Arrow(_) => "arrow",
            Element::Text(_) => "text",
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            // Wings extend past the segment.
            Element::Arrow(s) => self.to_path().bounding_box().union(s.bounds()),
            _ => self.shape().bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.shape().hit_test(point, tolerance)
    }

    /// Eraser hit test.
    ///
    /// Boxes and text use their bounds as-is; paths, lines and arrows reach
    /// [`ERASER_TOLERANCE`] beyond their geometry.
    pub fn erase_hit(&self, point: Point) -> bool {
        match self {
            Element::Rect(_) | Element::Circle(_) | Element::Text(_) => self.hit_test(point, 0.0),
            Element::Path(_) | Element::Line(_) | Element::Arrow(_) => {
                self.hit_test(point, ERASER_TOLERANCE)
            }
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Circle(s) => s.to_ellipse_path(),
            Element::Arrow(s) => {
                let mut path = s.to_path();
                for wing in arrow_wings(s.start(), s.end(), s.stroke_width) {
                    path.move_to(s.end());
                    path.line_to(wing);
                }
                path
            }
            _ => self.shape().to_path(),
        }
    }

    pub fn color(&self) -> &CssColor {
        self.shape().color()
    }

    /// Parsed stroke color; unparseable strings fall back to black.
    pub fn stroke_color(&self) -> Color {
        self.color().to_color().unwrap_or(Color::BLACK)
    }

    /// Parsed fill color for rect and circle, `None` when absent or transparent.
    pub fn fill_color(&self) -> Option<Color> {
        match self {
            Element::Rect(s) | Element::Circle(s) => s.fill(),
            _ => None,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        self.shape().stroke_width()
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathElement> {
        match self {
            Element::Path(p) => Some(p),
            _ => None,
        }
    }
}
