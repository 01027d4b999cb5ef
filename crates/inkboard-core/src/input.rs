//! Pointer and keyboard events delivered to the canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in surface pixels, relative to the canvas's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Down { position: Point },
    /// Motion, whether or not a button is held.
    Move { position: Point },
    Up,
    /// The pointer left the canvas; ends a gesture like [`PointerEvent::Up`].
    Leave,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64) -> Self {
        Self::Down {
            position: Point::new(x, y),
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::Move {
            position: Point::new(x, y),
        }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down { position } | Self::Move { position } => Some(*position),
            Self::Up | Self::Leave => None,
        }
    }

    /// True for events that end a gesture.
    pub fn is_release(&self) -> bool {
        matches!(self, Self::Up | Self::Leave)
    }
}

/// Keyboard input for the inline text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", rename_all = "lowercase")]
pub enum KeyEvent {
    /// Typed characters.
    Text { text: String },
    Backspace,
    /// Enter confirms; Shift+Enter inserts a line break.
    Enter {
        #[serde(default)]
        shift: bool,
    },
    /// Focus left the entry, which confirms it.
    Blur,
}

impl KeyEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_position() {
        assert_eq!(PointerEvent::down(1.0, 2.0).position(), Some(Point::new(1.0, 2.0)));
        assert_eq!(PointerEvent::moved(3.0, 4.0).position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(PointerEvent::Up.position(), None);
        assert!(PointerEvent::Leave.is_release());
        assert!(!PointerEvent::down(0.0, 0.0).is_release());
    }

    #[test]
    fn test_pointer_json() {
        let ev: PointerEvent =
            serde_json::from_str(r#"{"kind":"down","position":{"x":10,"y":20}}"#).unwrap();
        assert_eq!(ev, PointerEvent::down(10.0, 20.0));
        let ev: PointerEvent = serde_json::from_str(r#"{"kind":"leave"}"#).unwrap();
        assert_eq!(ev, PointerEvent::Leave);
    }

    #[test]
    fn test_key_json() {
        let ev: KeyEvent = serde_json::from_str(r#"{"key":"enter"}"#).unwrap();
        assert_eq!(ev, KeyEvent::Enter { shift: false });
        let ev: KeyEvent = serde_json::from_str(r#"{"key":"text","text":"hi"}"#).unwrap();
        assert_eq!(ev, KeyEvent::text("hi"));
    }
}
