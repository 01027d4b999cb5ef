//! Headless PNG export.

use inkboard_core::canvas::Canvas;
use inkboard_core::shapes::Element;
use inkboard_render::{PngRenderResult, RenderContext, Renderer, RendererError, VelloRenderer};
use kurbo::{Size, Vec2};
use peniko::Color;
use thiserror::Error;
use vello::{AaConfig, RenderParams, RendererOptions, Scene};

/// Margin around the drawing when fitting it to the image, in pixels.
const FIT_MARGIN: f64 = 20.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Image size must be non-zero, got {0}x{1}")]
    EmptySize(u32, u32),
    #[error("No compatible GPU adapter found")]
    NoAdapter,
    #[error(transparent)]
    Renderer(#[from] RendererError),
    #[error("Pixel readback failed: {0}")]
    Readback(String),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
}

/// Image size and view for an export.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    pub width: u32,
    pub height: u32,
    /// Explicit view scale; `None` fits the drawing to the image.
    pub scale: Option<f64>,
    /// View offset, used with an explicit scale.
    pub offset: Vec2,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            scale: None,
            offset: Vec2::ZERO,
        }
    }
}

/// Build the canvas to render: the elements under the requested view.
pub fn prepare_canvas(elements: Vec<Element>, options: &ExportOptions) -> Canvas {
    let mut canvas = Canvas::new();
    canvas.load(elements);
    canvas.set_viewport_size(options.width as f64, options.height as f64);

    match options.scale {
        Some(scale) => {
            canvas.camera.scale = scale;
            canvas.camera.offset = options.offset;
        }
        None => {
            if let Some(bounds) = canvas.scene.bounds() {
                let available = Size::new(
                    (options.width as f64 - 2.0 * FIT_MARGIN).max(1.0),
                    (options.height as f64 - 2.0 * FIT_MARGIN).max(1.0),
                );
                let scale = (available.width / bounds.width().max(1.0))
                    .min(available.height / bounds.height().max(1.0))
                    .min(1.0);
                let drawn = Size::new(bounds.width() * scale, bounds.height() * scale);
                canvas.camera.scale = scale;
                canvas.camera.offset = Vec2::new(
                    (options.width as f64 - drawn.width) / 2.0 - bounds.x0 * scale,
                    (options.height as f64 - drawn.height) / 2.0 - bounds.y0 * scale,
                );
            }
        }
    }
    canvas
}

/// Render the canvas and encode it as PNG.
pub fn export_png(canvas: &Canvas, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptySize(width, height));
    }

    let mut renderer = VelloRenderer::new();
    let ctx = RenderContext::new(canvas, Size::new(width as f64, height as f64));
    renderer.build_scene(&ctx);
    let scene = renderer.take_scene();

    let pixels = pollster::block_on(render_scene_to_rgba(&scene, width, height))?;
    encode_png(&pixels.rgba_data, pixels.width, pixels.height)
}

/// Render a Vello scene on an offscreen texture and read the pixels back.
async fn render_scene_to_rgba(
    scene: &Scene,
    width: u32,
    height: u32,
) -> Result<PngRenderResult, ExportError> {
    let mut render_cx = vello::util::RenderContext::new();
    let device_id = render_cx.device(None).await.ok_or(ExportError::NoAdapter)?;
    let handle = &render_cx.devices[device_id];
    let device = &handle.device;
    let queue = &handle.queue;

    let mut vello_renderer = vello::Renderer::new(device, RendererOptions::default())
        .map_err(|e| RendererError::InitFailed(format!("{:?}", e)))?;

    let texture = device.create_texture(&vello::wgpu::TextureDescriptor {
        label: Some("png export texture"),
        size: vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: vello::wgpu::TextureDimension::D2,
        format: vello::wgpu::TextureFormat::Rgba8Unorm,
        usage: vello::wgpu::TextureUsages::STORAGE_BINDING
            | vello::wgpu::TextureUsages::COPY_SRC
            | vello::wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let texture_view = texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

    let params = RenderParams {
        base_color: Color::WHITE,
        width,
        height,
        antialiasing_method: AaConfig::Area,
    };
    vello_renderer
        .render_to_texture(device, queue, scene, &texture_view, &params)
        .map_err(|e| RendererError::RenderFailed(format!("{:?}", e)))?;

    // wgpu requires 256-byte aligned rows.
    let bytes_per_row = (width * 4).next_multiple_of(256);
    let buffer_size = (bytes_per_row * height) as u64;
    let readback_buffer = device.create_buffer(&vello::wgpu::BufferDescriptor {
        label: Some("png readback buffer"),
        size: buffer_size,
        usage: vello::wgpu::BufferUsages::COPY_DST | vello::wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
        label: Some("png copy encoder"),
    });
    encoder.copy_texture_to_buffer(
        vello::wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: vello::wgpu::Origin3d::ZERO,
            aspect: vello::wgpu::TextureAspect::All,
        },
        vello::wgpu::TexelCopyBufferInfo {
            buffer: &readback_buffer,
            layout: vello::wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(height),
            },
        },
        vello::wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    queue.submit(std::iter::once(encoder.finish()));

    let buffer_slice = readback_buffer.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    buffer_slice.map_async(vello::wgpu::MapMode::Read, move |result| {
        tx.send(result).ok();
    });
    let _ = device.poll(vello::wgpu::PollType::wait_indefinitely());
    rx.recv()
        .map_err(|e| ExportError::Readback(e.to_string()))?
        .map_err(|e| ExportError::Readback(format!("{:?}", e)))?;

    let data = buffer_slice.get_mapped_range();
    let rgba_data = strip_row_padding(&data, width, height, bytes_per_row);
    drop(data);
    readback_buffer.unmap();

    log::debug!("Read back {}x{} pixels", width, height);
    Ok(PngRenderResult {
        rgba_data,
        width,
        height,
    })
}

/// Drop the per-row alignment padding from a readback buffer.
fn strip_row_padding(data: &[u8], width: u32, height: u32, bytes_per_row: u32) -> Vec<u8> {
    let row_len = (width * 4) as usize;
    let mut rgba_data = Vec::with_capacity(row_len * height as usize);
    for row in 0..height {
        let row_start = (row * bytes_per_row) as usize;
        rgba_data.extend_from_slice(&data[row_start..row_start + row_len]);
    }
    rgba_data
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgba_data)?;
    }
    Ok(png_data)
}
