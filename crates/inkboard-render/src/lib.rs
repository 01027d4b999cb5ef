//! Inkboard Render Library
//!
//! Renderer abstraction and implementations for inkboard.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;
mod surface;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use surface::Surface;

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{PngRenderResult, VelloRenderer};
