//! Raster surface bookkeeping: size tracking and redraw-on-change.

use crate::renderer::{RenderContext, Renderer};
use inkboard_core::canvas::Canvas;
use kurbo::Size;

/// A drawing surface whose pixel size follows its container.
///
/// Resizing a raster discards its pixels, so every resize redraws from the
/// model immediately.
pub struct Surface<R: Renderer> {
    renderer: R,
    width: u32,
    height: u32,
    /// Canvas revision of the last frame, `None` before the first one.
    drawn_revision: Option<u64>,
    frames: u64,
}

impl<R: Renderer> Surface<R> {
    pub fn new(renderer: R, width: u32, height: u32) -> Self {
        Self {
            renderer,
            width: width.max(1),
            height: height.max(1),
            drawn_revision: None,
            frames: 0,
        }
    }

    /// Current pixel size.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Number of frames built so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Recreate the surface at the new size and redraw.
    pub fn resize(&mut self, canvas: &mut Canvas, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        log::debug!("Surface resized to {}x{}", self.width, self.height);
        canvas.set_viewport_size(self.width as f64, self.height as f64);
        self.redraw(canvas);
    }

    /// Build a frame unconditionally.
    pub fn redraw(&mut self, canvas: &Canvas) {
        let size = Size::new(self.width as f64, self.height as f64);
        self.renderer.build_scene(&RenderContext::new(canvas, size));
        self.drawn_revision = Some(canvas.revision());
        self.frames += 1;
    }

    /// Build a frame only if the canvas changed since the last one.
    pub fn redraw_if_changed(&mut self, canvas: &Canvas) -> bool {
        if self.drawn_revision == Some(canvas.revision()) {
            return false;
        }
        self.redraw(canvas);
        true
    }
}
