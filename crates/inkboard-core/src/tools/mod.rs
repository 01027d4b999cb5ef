//! Tool system for the canvas.

mod text_entry;

pub use text_entry::{EntryOutcome, TextEntry};

use crate::camera::Camera;
use crate::input::KeyEvent;
use crate::scene::Scene;
use crate::shapes::{
    CssColor, DEFAULT_FONT_SIZE, DEFAULT_STROKE_WIDTH, Element, LineElement, PathElement,
    RectElement,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// Drag to pan the view.
    Select,
    #[default]
    Pen,
    Rect,
    Circle,
    Line,
    Arrow,
    Text,
    Eraser,
}

impl ToolKind {
    /// Get all tools in toolbar order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Select,
            ToolKind::Pen,
            ToolKind::Rect,
            ToolKind::Circle,
            ToolKind::Line,
            ToolKind::Arrow,
            ToolKind::Text,
            ToolKind::Eraser,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Pen => "pen",
            ToolKind::Rect => "rect",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Arrow => "arrow",
            ToolKind::Text => "text",
            ToolKind::Eraser => "eraser",
        }
    }

    /// True for tools whose gesture builds a draft element.
    pub fn draws(&self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Rect | ToolKind::Circle | ToolKind::Line | ToolKind::Arrow
        )
    }
}

/// Style captured into each element at the moment it is created.
///
/// Changing it never restyles elements already drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawingContext {
    pub color: CssColor,
    pub fill_color: CssColor,
    pub stroke_width: f64,
    pub font_size: f64,
}

impl Default for DrawingContext {
    fn default() -> Self {
        Self {
            color: CssColor::black(),
            fill_color: CssColor::transparent(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolState {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Select tool drag; `last` is the previous surface position.
    Panning { last: Point },
    /// A drawing tool is building `draft`, which is not yet in the scene.
    Drawing { draft: Element },
    /// Eraser held down.
    Erasing,
    /// Text tool entry open.
    TextEntry(TextEntry),
}

/// Manages the current tool and its gesture.
///
/// Every handler returns `true` when the scene, the view or the
/// in-progress preview changed and the canvas needs a redraw.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools. An in-progress draft is committed and an open text entry
    /// is confirmed, so nothing already drawn is lost.
    pub fn set_tool(&mut self, tool: ToolKind, ctx: &DrawingContext, scene: &mut Scene) -> bool {
        let changed = self.finish(ctx, scene);
        if self.current_tool != tool {
            log::debug!("Tool {} -> {}", self.current_tool.name(), tool.name());
        }
        self.current_tool = tool;
        changed
    }

    /// Pointer pressed at a surface position.
    pub fn press(
        &mut self,
        screen: Point,
        ctx: &DrawingContext,
        scene: &mut Scene,
        camera: &mut Camera,
    ) -> bool {
        // A press outside the entry blurs it first.
        let mut changed = self.finish(ctx, scene);
        let world = camera.screen_to_world(screen);

        self.state = match self.current_tool {
            ToolKind::Select => ToolState::Panning { last: screen },
            ToolKind::Eraser => {
                changed |= scene.erase_at(world) > 0;
                ToolState::Erasing
            }
            ToolKind::Text => {
                changed = true;
                ToolState::TextEntry(TextEntry::new(world))
            }
            tool => {
                changed = true;
                ToolState::Drawing {
                    draft: new_draft(tool, world, ctx),
                }
            }
        };

        if let ToolState::Drawing { draft } = &self.state {
            log::debug!("Begin {} at ({:.1}, {:.1})", draft.type_name(), world.x, world.y);
        }
        changed
    }

    /// Pointer moved. Ignored unless a gesture is in progress.
    pub fn drag(&mut self, screen: Point, scene: &mut Scene, camera: &mut Camera) -> bool {
        match &mut self.state {
            ToolState::Panning { last } => {
                camera.pan(screen - *last);
                *last = screen;
                true
            }
            ToolState::Erasing => scene.erase_at(camera.screen_to_world(screen)) > 0,
            ToolState::Drawing { draft } => {
                extend_draft(draft, camera.screen_to_world(screen));
                true
            }
            ToolState::Idle | ToolState::TextEntry(_) => false,
        }
    }

    /// Pointer released or left the canvas. Commits the draft.
    pub fn release(&mut self, scene: &mut Scene) -> bool {
        match std::mem::take(&mut self.state) {
            ToolState::Drawing { draft } => {
                log::debug!("Commit {}", draft.type_name());
                scene.push(draft);
                true
            }
            // The entry stays open until confirmed.
            entry @ ToolState::TextEntry(_) => {
                self.state = entry;
                false
            }
            ToolState::Panning { .. } | ToolState::Erasing | ToolState::Idle => false,
        }
    }

    /// Keyboard input. Ignored unless a text entry is open.
    pub fn key(&mut self, event: &KeyEvent, ctx: &DrawingContext, scene: &mut Scene) -> bool {
        let ToolState::TextEntry(entry) = &mut self.state else {
            return false;
        };
        match entry.handle_key(event, ctx) {
            EntryOutcome::Editing => true,
            EntryOutcome::Confirmed(element) => {
                self.state = ToolState::Idle;
                if let Some(element) = element {
                    scene.push(element);
                }
                true
            }
        }
    }

    /// Commit any draft and confirm any open entry, as a blur would.
    pub fn finish_gesture(&mut self, ctx: &DrawingContext, scene: &mut Scene) -> bool {
        self.finish(ctx, scene)
    }

    /// Drop the gesture and any open entry without touching the scene.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a press/drag gesture is in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self.state,
            ToolState::Panning { .. } | ToolState::Drawing { .. } | ToolState::Erasing
        )
    }

    /// The element under construction, if any.
    pub fn preview(&self) -> Option<&Element> {
        match &self.state {
            ToolState::Drawing { draft } => Some(draft),
            _ => None,
        }
    }

    pub fn text_entry(&self) -> Option<&TextEntry> {
        match &self.state {
            ToolState::TextEntry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Commit a draft and confirm an open entry, leaving the manager idle.
    fn finish(&mut self, ctx: &DrawingContext, scene: &mut Scene) -> bool {
        match std::mem::take(&mut self.state) {
            ToolState::Drawing { draft } => {
                scene.push(draft);
                true
            }
            ToolState::TextEntry(entry) => match entry.confirm(ctx) {
                Some(element) => {
                    scene.push(element);
                    true
                }
                // Closing the overlay still needs a redraw.
                None => true,
            },
            ToolState::Panning { .. } | ToolState::Erasing | ToolState::Idle => false,
        }
    }
}

/// Start the element a drawing tool builds, anchored at `at`.
fn new_draft(tool: ToolKind, at: Point, ctx: &DrawingContext) -> Element {
    let color = ctx.color.clone();
    match tool {
        ToolKind::Rect => Element::Rect(RectElement::new(
            at,
            0.0,
            0.0,
            color,
            Some(ctx.fill_color.clone()),
            ctx.stroke_width,
        )),
        ToolKind::Circle => Element::Circle(RectElement::new(
            at,
            0.0,
            0.0,
            color,
            Some(ctx.fill_color.clone()),
            ctx.stroke_width,
        )),
        ToolKind::Line => Element::Line(LineElement::new(at, at, color, ctx.stroke_width)),
        ToolKind::Arrow => Element::Arrow(LineElement::new(at, at, color, ctx.stroke_width)),
        ToolKind::Pen | ToolKind::Select | ToolKind::Text | ToolKind::Eraser => {
            Element::Path(PathElement::new(at, color, ctx.stroke_width))
        }
    }
}

/// Apply a drag to the draft: pens grow, boxes stretch, segments move their end.
fn extend_draft(draft: &mut Element, to: Point) {
    match draft {
        Element::Path(path) => path.add_point(to),
        Element::Rect(rect) | Element::Circle(rect) => rect.set_corner(to),
        Element::Line(line) | Element::Arrow(line) => line.set_end(to),
        Element::Text(_) => {}
    }
}
