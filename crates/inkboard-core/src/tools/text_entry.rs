//! Inline text entry opened by the text tool.

use crate::camera::Camera;
use crate::input::KeyEvent;
use crate::shapes::{Element, TextElement};
use kurbo::Point;

use super::DrawingContext;

/// Result of feeding a key to an open entry.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Still editing.
    Editing,
    /// Entry closed; carries the element to append, if any text was typed.
    Confirmed(Option<Element>),
}

/// Text being typed at a scene position, before it becomes an element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEntry {
    /// Baseline anchor in scene coordinates.
    pub anchor: Point,
    pub value: String,
}

impl TextEntry {
    pub fn new(anchor: Point) -> Self {
        Self {
            anchor,
            value: String::new(),
        }
    }

    /// Where the overlay sits on the surface, tracking pan and zoom.
    pub fn screen_position(&self, camera: &Camera) -> Point {
        camera.world_to_screen(self.anchor)
    }

    /// Overlay font size in surface pixels.
    pub fn screen_font_size(&self, camera: &Camera, font_size: f64) -> f64 {
        font_size * camera.scale
    }

    /// Apply a key event.
    pub fn handle_key(&mut self, event: &KeyEvent, ctx: &DrawingContext) -> EntryOutcome {
        match event {
            KeyEvent::Text { text } => {
                self.value.push_str(text);
                EntryOutcome::Editing
            }
            KeyEvent::Backspace => {
                self.value.pop();
                EntryOutcome::Editing
            }
            KeyEvent::Enter { shift: true } => {
                self.value.push('\n');
                EntryOutcome::Editing
            }
            KeyEvent::Enter { shift: false } | KeyEvent::Blur => {
                EntryOutcome::Confirmed(self.confirm(ctx))
            }
        }
    }

    /// Build the element for this entry with the current style.
    /// An empty value produces nothing.
    pub fn confirm(&self, ctx: &DrawingContext) -> Option<Element> {
        if self.value.is_empty() {
            return None;
        }
        Some(Element::Text(TextElement::new(
            self.anchor,
            self.value.clone(),
            ctx.color.clone(),
            ctx.font_size,
        )))
    }
}
