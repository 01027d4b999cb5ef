//! Editing session state: scene, view and tools together.

use crate::camera::Camera;
use crate::input::{KeyEvent, PointerEvent};
use crate::scene::Scene;
use crate::shapes::Element;
use crate::tools::{DrawingContext, TextEntry, ToolKind, ToolManager};
use kurbo::{Point, Size};

/// Runtime canvas state (not persisted).
///
/// Owns the working draft of one document. `revision` changes whenever
/// something visible changes, so a front end can skip redundant redraws.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Committed elements.
    pub scene: Scene,
    /// Camera for view transform.
    pub camera: Camera,
    /// Tool manager.
    pub tool_manager: ToolManager,
    /// Style applied to the next element created.
    pub style: DrawingContext,
    /// Viewport size.
    pub viewport_size: Size,
    revision: u64,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create a new canvas with an empty scene.
    pub fn new() -> Self {
        Self::with_scene(Scene::new())
    }

    /// Create a canvas showing an existing scene.
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            camera: Camera::new(),
            tool_manager: ToolManager::new(),
            style: DrawingContext::default(),
            viewport_size: Size::new(800.0, 600.0),
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self, changed: bool) -> bool {
        if changed {
            self.revision = self.revision.wrapping_add(1);
        }
        changed
    }

    /// Route a pointer event to the active tool. Returns true if a redraw is needed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let changed = match event {
            PointerEvent::Down { position } => self.tool_manager.press(
                position,
                &self.style,
                &mut self.scene,
                &mut self.camera,
            ),
            PointerEvent::Move { position } => {
                self.tool_manager
                    .drag(position, &mut self.scene, &mut self.camera)
            }
            PointerEvent::Up | PointerEvent::Leave => self.tool_manager.release(&mut self.scene),
        };
        self.touch(changed)
    }

    /// Route a key event to the open text entry, if any.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let changed = self.tool_manager.key(event, &self.style, &mut self.scene);
        self.touch(changed)
    }

    /// Select a tool, finishing whatever the previous one was doing.
    pub fn set_tool(&mut self, tool: ToolKind) {
        let changed = self.tool_manager.set_tool(tool, &self.style, &mut self.scene);
        self.touch(changed);
    }

    /// Commit whatever is in progress so the scene holds everything drawn.
    pub fn commit_pending(&mut self) {
        let changed = self
            .tool_manager
            .finish_gesture(&self.style, &mut self.scene);
        self.touch(changed);
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tool_manager.current_tool
    }

    /// Replace the style for elements created from now on.
    pub fn set_style(&mut self, style: DrawingContext) {
        self.style = style;
        // The text overlay is sized from the style.
        let overlay_open = self.text_entry().is_some();
        self.touch(overlay_open);
    }

    /// Replace the scene with loaded elements and reset the view.
    pub fn load(&mut self, elements: Vec<Element>) {
        self.tool_manager.cancel();
        self.scene = Scene::from_elements(elements);
        self.camera.reset();
        self.touch(true);
    }

    /// The element being drawn, shown on top of the scene.
    pub fn preview(&self) -> Option<&Element> {
        self.tool_manager.preview()
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        self.tool_manager.text_entry()
    }

    /// Elements in z-order.
    pub fn elements(&self) -> &[Element] {
        self.scene.elements()
    }

    /// Set the viewport size.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        let changed = size != self.viewport_size;
        self.viewport_size = size;
        self.touch(changed);
    }

    pub fn zoom_in(&mut self) {
        self.camera.zoom_in();
        self.touch(true);
    }

    pub fn zoom_out(&mut self) {
        self.camera.zoom_out();
        self.touch(true);
    }

    /// Zoom around a surface point, e.g. the cursor on a wheel event.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.camera.zoom_at(screen_point, factor);
        self.touch(true);
    }

    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.touch(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyEvent;
    use crate::shapes::{CssColor, PathElement};
    use kurbo::Vec2;

    #[test]
    fn test_canvas_defaults() {
        let canvas = Canvas::new();
        assert!(canvas.elements().is_empty());
        assert_eq!(canvas.current_tool(), ToolKind::Pen);
        assert_eq!(canvas.style, DrawingContext::default());
        assert_eq!(canvas.revision(), 0);
    }

    #[test]
    fn test_pen_gesture_through_canvas() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(PointerEvent::down(10.0, 10.0));
        canvas.handle_pointer(PointerEvent::moved(20.0, 10.0));
        canvas.handle_pointer(PointerEvent::moved(20.0, 20.0));
        assert_eq!(canvas.preview().map(Element::type_name), Some("path"));
        assert!(canvas.elements().is_empty());

        canvas.handle_pointer(PointerEvent::Leave);
        assert!(canvas.preview().is_none());
        assert_eq!(canvas.elements().len(), 1);
        assert_eq!(canvas.elements()[0].as_path().unwrap().len(), 3);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut canvas = Canvas::new();
        assert!(!canvas.handle_pointer(PointerEvent::moved(5.0, 5.0)));
        assert_eq!(canvas.revision(), 0);

        canvas.handle_pointer(PointerEvent::down(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::Up);
        assert_eq!(canvas.revision(), 2);

        canvas.zoom_in();
        assert_eq!(canvas.revision(), 3);

        canvas.set_viewport_size(800.0, 600.0);
        assert_eq!(canvas.revision(), 3);
        canvas.set_viewport_size(1024.0, 768.0);
        assert_eq!(canvas.revision(), 4);
    }

    #[test]
    fn test_load_resets_view_and_gesture() {
        let mut canvas = Canvas::new();
        canvas.camera.offset = Vec2::new(40.0, 40.0);
        canvas.camera.scale = 2.0;
        canvas.handle_pointer(PointerEvent::down(0.0, 0.0));

        let loaded = vec![Element::Path(PathElement::from_points(
            vec![Point::new(1.0, 1.0)],
            CssColor::black(),
            2.0,
        ))];
        canvas.load(loaded.clone());

        assert_eq!(canvas.elements(), loaded.as_slice());
        assert_eq!(canvas.camera, Camera::default());
        assert!(canvas.preview().is_none());

        // The cancelled gesture must not commit on release.
        canvas.handle_pointer(PointerEvent::Up);
        assert_eq!(canvas.elements().len(), 1);
    }

    #[test]
    fn test_text_via_keys() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Text);
        canvas.style.font_size = 30.0;
        canvas.handle_pointer(PointerEvent::down(10.0, 50.0));
        canvas.handle_pointer(PointerEvent::Up);
        assert!(canvas.text_entry().is_some());

        canvas.handle_key(&KeyEvent::text("Hi"));
        canvas.handle_key(&KeyEvent::Enter { shift: false });
        let text = canvas.elements()[0].as_text().unwrap();
        assert_eq!(text.text, "Hi");
        assert!((text.font_size - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_tool_commits_draft() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Line);
        canvas.handle_pointer(PointerEvent::down(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::moved(30.0, 0.0));
        canvas.set_tool(ToolKind::Select);
        assert_eq!(canvas.elements().len(), 1);
        assert_eq!(canvas.elements()[0].type_name(), "line");
    }

    #[test]
    fn test_pan_then_draw_in_scene_space() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Select);
        canvas.handle_pointer(PointerEvent::down(0.0, 0.0));
        canvas.handle_pointer(PointerEvent::moved(100.0, 50.0));
        canvas.handle_pointer(PointerEvent::Up);
        assert_eq!(canvas.camera.offset, Vec2::new(100.0, 50.0));

        canvas.set_tool(ToolKind::Pen);
        canvas.handle_pointer(PointerEvent::down(110.0, 60.0));
        canvas.handle_pointer(PointerEvent::Up);
        let path = canvas.elements()[0].as_path().unwrap();
        assert_eq!(path.points[0], Point::new(10.0, 10.0));
    }
}
