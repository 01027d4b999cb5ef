//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest scale the zoom controls reach.
pub const MIN_SCALE: f64 = 0.1;

/// Largest scale the zoom controls reach.
pub const MAX_SCALE: f64 = 5.0;

/// Scale change per zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

/// Camera manages the view transform for the canvas.
///
/// Scene points map to surface pixels as `scene * scale + offset`.
/// The clamp to [`MIN_SCALE`, `MAX_SCALE`] is applied by the zoom
/// operations only; writing `scale` directly is unchecked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Pan offset in surface pixels.
    pub offset: Vec2,
    /// Uniform scale factor, 1.0 = 100%.
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a surface point to scene coordinates: `(p - offset) / scale`.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        Point::new(
            (screen_point.x - self.offset.x) / self.scale,
            (screen_point.y - self.offset.y) / self.scale,
        )
    }

    /// Convert a scene point to surface coordinates: `p * scale + offset`.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        Point::new(
            world_point.x * self.scale + self.offset.x,
            world_point.y * self.scale + self.offset.y,
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Step the scale up, as the toolbar zoom-in button does.
    pub fn zoom_in(&mut self) {
        self.scale = (self.scale + ZOOM_STEP).min(MAX_SCALE);
    }

    /// Step the scale down, as the toolbar zoom-out button does.
    pub fn zoom_out(&mut self) {
        self.scale = (self.scale - ZOOM_STEP).max(MIN_SCALE);
    }

    /// Zoom the camera, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.scale = new_scale;

        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
    }

    /// Scale as a whole percentage for display.
    pub fn zoom_percent(&self) -> i64 {
        (self.scale * 100.0).round() as i64
    }

    /// Reset to `offset = (0, 0)`, `scale = 1`.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
