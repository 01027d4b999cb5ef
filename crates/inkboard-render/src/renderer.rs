//! Renderer trait abstraction.

use inkboard_core::canvas::Canvas;
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in surface pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with a white background.
    pub fn new(canvas: &'a Canvas, viewport_size: Size) -> Self {
        Self {
            canvas,
            viewport_size,
            background_color: Color::WHITE,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// Called once per frame; the previous frame's commands are discarded.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_background_is_white() {
        let canvas = Canvas::new();
        let ctx = RenderContext::new(&canvas, Size::new(10.0, 10.0));
        assert_eq!(ctx.background_color.components, Color::WHITE.components);

        let ctx = ctx.with_background(Color::BLACK);
        assert_eq!(ctx.background_color.components, Color::BLACK.components);
    }

    #[test]
    fn test_error_messages() {
        let err = RendererError::InitFailed("no adapter".to_string());
        assert_eq!(err.to_string(), "Initialization failed: no adapter");
    }
}
