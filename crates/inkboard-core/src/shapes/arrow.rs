//! Arrowhead geometry.
//!
//! An arrow is a [`LineElement`](super::LineElement) with two wings at its end point.

use kurbo::Point;
use std::f64::consts::PI;

/// Angle between the shaft and each wing.
pub const ARROW_HEAD_ANGLE: f64 = PI / 6.0;

/// Wing length grows with the stroke so heavy arrows keep a visible head.
pub fn arrow_head_length(stroke_width: f64) -> f64 {
    10.0 + stroke_width
}

/// The two wing tips of an arrow from `start` to `end`.
///
/// Each wing runs from `end` back along the shaft, rotated by
/// [`ARROW_HEAD_ANGLE`] to either side.
pub fn arrow_wings(start: Point, end: Point, stroke_width: f64) -> [Point; 2] {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let length = arrow_head_length(stroke_width);
    let wing = |theta: f64| {
        Point::new(
            end.x - length * theta.cos(),
            end.y - length * theta.sin(),
        )
    };
    [wing(angle - ARROW_HEAD_ANGLE), wing(angle + ARROW_HEAD_ANGLE)]
}
