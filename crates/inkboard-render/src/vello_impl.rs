//! Vello-based renderer implementation.

use crate::renderer::{RenderContext, Renderer};
use inkboard_core::camera::Camera;
use inkboard_core::shapes::{Element, TextElement};
use inkboard_core::tools::TextEntry;
use kurbo::{Affine, Cap, Join, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{Alignment, AlignmentOptions, FontContext, FontStack, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Result of PNG rendering - contains the raw RGBA pixel data and dimensions.
#[derive(Debug)]
pub struct PngRenderResult {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

/// Font stack for all canvas text.
const FONT_STACK: &str = "sans-serif";

/// Minimum width of the text-entry box, in surface pixels.
const ENTRY_MIN_WIDTH: f64 = 120.0;

fn entry_border_color() -> Color {
    Color::from_rgba8(59, 130, 246, 255)
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached across frames).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Render a geometric element: fill first, then stroke.
    fn render_element(&mut self, element: &Element, transform: Affine) {
        if let Element::Text(text) = element {
            self.render_text(text, transform);
            return;
        }
        if let Element::Path(path) = element {
            if let Some(dot) = path.dot() {
                self.scene
                    .fill(Fill::NonZero, transform, element.stroke_color(), None, &dot);
                return;
            }
        }

        let path = element.to_path();
        if let Some(fill) = element.fill_color() {
            self.scene.fill(Fill::NonZero, transform, fill, None, &path);
        }

        let width = element.stroke_width();
        if width > 0.0 {
            let stroke = Stroke::new(width)
                .with_caps(Cap::Round)
                .with_join(Join::Round);
            self.scene
                .stroke(&stroke, transform, element.stroke_color(), None, &path);
        }
    }

    fn render_text(&mut self, text: &TextElement, transform: Affine) {
        if text.text.is_empty() {
            return;
        }
        let brush = Brush::Solid(text.color.to_color().unwrap_or(Color::BLACK));
        self.draw_text(
            &text.text,
            text.anchor(),
            text.effective_font_size(),
            brush,
            transform,
        );
    }

    /// Lay out `content` with parley and draw it with the first line's
    /// baseline at `anchor`. Returns the laid-out width.
    fn draw_text(
        &mut self,
        content: &str,
        anchor: Point,
        font_size: f64,
        brush: Brush,
        transform: Affine,
    ) -> f64 {
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(FontStack::Source(FONT_STACK.into())));
        let mut layout = builder.build(content);
        layout.break_all_lines(None);
        layout.align(None, Alignment::Start, AlignmentOptions::default());

        let baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline as f64)
            .unwrap_or(0.0);
        let text_transform = transform * Affine::translate((anchor.x, anchor.y - baseline));

        let mut glyph_count = 0;
        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();
                glyph_count += glyphs.len();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        if glyph_count == 0 {
            log::debug!("No glyphs for {:?}; is a {} font installed?", content, FONT_STACK);
        }
        layout.width() as f64
    }

    /// Draw the pending text input box in surface space, over everything else.
    fn render_text_entry(
        &mut self,
        entry: &TextEntry,
        camera: &Camera,
        color: Color,
        font_size: f64,
    ) {
        let origin = entry.screen_position(camera);
        let size = entry.screen_font_size(camera, font_size);

        let width = if entry.value.is_empty() {
            0.0
        } else {
            self.draw_text(
                &entry.value,
                origin,
                size,
                Brush::Solid(color),
                Affine::IDENTITY,
            )
        };

        let padding = 4.0;
        let frame = Rect::new(
            origin.x - padding,
            origin.y - size - padding,
            origin.x + width.max(ENTRY_MIN_WIDTH) + padding,
            origin.y + size * 0.3 + padding,
        );
        self.scene
            .stroke(&Stroke::new(1.0), Affine::IDENTITY, entry_border_color(), None, &frame);

        let caret_x = origin.x + width + 1.0;
        let caret = kurbo::Line::new((caret_x, origin.y - size), (caret_x, origin.y + size * 0.2));
        self.scene
            .stroke(&Stroke::new(1.0), Affine::IDENTITY, color, None, &caret);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        let viewport = Rect::new(0.0, 0.0, ctx.viewport_size.width, ctx.viewport_size.height);
        self.scene.fill(
            Fill::NonZero,
            Affine::IDENTITY,
            self.background_color(ctx),
            None,
            &viewport,
        );

        let canvas = ctx.canvas;
        let camera_transform = canvas.camera.transform();

        for element in canvas.elements() {
            self.render_element(element, camera_transform);
        }

        // Draft of the gesture in progress.
        if let Some(preview) = canvas.preview() {
            self.render_element(preview, camera_transform);
        }

        if let Some(entry) = canvas.text_entry() {
            let color = canvas.style.color.to_color().unwrap_or(Color::BLACK);
            self.render_text_entry(entry, &canvas.camera, color, canvas.style.font_size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkboard_core::canvas::Canvas;
    use inkboard_core::input::PointerEvent;
    use inkboard_core::scene::Scene as ElementScene;
    use inkboard_core::shapes::{CssColor, LineElement, PathElement, RectElement};
    use kurbo::Size;

    fn sample_scene() -> ElementScene {
        let mut scene = ElementScene::new();
        scene.push(Element::Path(PathElement::from_points(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)],
            CssColor::black(),
            2.0,
        )));
        scene.push(Element::Rect(RectElement::new(
            Point::new(20.0, 20.0),
            30.0,
            10.0,
            CssColor::new("#ff0000"),
            Some(CssColor::new("#00ff00")),
            2.0,
        )));
        scene.push(Element::Circle(RectElement::new(
            Point::new(60.0, 60.0),
            -20.0,
            10.0,
            CssColor::black(),
            Some(CssColor::transparent()),
            2.0,
        )));
        scene.push(Element::Arrow(LineElement::new(
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            CssColor::black(),
            3.0,
        )));
        scene
    }

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene_clears_background() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::new();
        let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0));

        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_scene_with_elements() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::with_scene(sample_scene());
        let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        let with_elements = renderer.scene().encoding().n_paths;

        let empty = Canvas::new();
        renderer.build_scene(&RenderContext::new(&empty, Size::new(800.0, 600.0)));
        assert!(with_elements > renderer.scene().encoding().n_paths);
    }

    #[test]
    fn test_rebuild_discards_previous_frame() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::with_scene(sample_scene());
        let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        let first = renderer.scene().encoding().n_paths;
        renderer.build_scene(&ctx);
        assert_eq!(renderer.scene().encoding().n_paths, first);
    }

    #[test]
    fn test_draft_is_drawn() {
        let mut renderer = VelloRenderer::new();
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::down(10.0, 10.0));
        canvas.handle_pointer(PointerEvent::moved(30.0, 30.0));
        assert!(canvas.preview().is_some());

        let ctx = RenderContext::new(&canvas, Size::new(800.0, 600.0));
        renderer.build_scene(&ctx);
        let with_draft = renderer.scene().encoding().n_paths;

        let empty = Canvas::new();
        renderer.build_scene(&RenderContext::new(&empty, Size::new(800.0, 600.0)));
        assert!(with_draft > renderer.scene().encoding().n_paths);
    }

    #[test]
    fn test_pen_click_paints_a_dot() {
        let size = Size::new(800.0, 600.0);
        let mut renderer = VelloRenderer::new();
        renderer.build_scene(&RenderContext::new(&Canvas::new(), size));
        let empty = renderer.scene().encoding().n_paths;

        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::down(50.0, 50.0));
        canvas.handle_pointer(PointerEvent::Up);
        let Some(Element::Path(path)) = canvas.elements().first() else {
            panic!("expected a committed path");
        };
        assert_eq!(path.len(), 1);

        renderer.build_scene(&RenderContext::new(&canvas, size));
        assert!(renderer.scene().encoding().n_paths > empty);
    }

    #[test]
    fn test_take_scene_resets() {
        let mut renderer = VelloRenderer::new();
        let canvas = Canvas::new();
        renderer.build_scene(&RenderContext::new(&canvas, Size::new(100.0, 100.0)));
        let scene = renderer.take_scene();
        assert!(!scene.encoding().is_empty());
        assert!(renderer.scene().encoding().is_empty());
    }
}
