//! Scripted input: a JSON list of steps replayed into a [`Canvas`].
//!
//! ```json
//! [
//!   { "step": "tool", "tool": "rect" },
//!   { "step": "style", "color": "#ff0000", "strokeWidth": 4 },
//!   { "step": "pointer", "kind": "down", "position": { "x": 10, "y": 10 } },
//!   { "step": "pointer", "kind": "move", "position": { "x": 80, "y": 60 } },
//!   { "step": "pointer", "kind": "up" }
//! ]
//! ```

use inkboard_core::canvas::Canvas;
use inkboard_core::input::{KeyEvent, PointerEvent};
use inkboard_core::shapes::CssColor;
use inkboard_core::tools::ToolKind;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Partial style change; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePatch {
    pub color: Option<CssColor>,
    pub fill_color: Option<CssColor>,
    pub stroke_width: Option<f64>,
    pub font_size: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomDirection {
    In,
    Out,
    Reset,
}

/// One scripted action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Tool { tool: ToolKind },
    Style(StylePatch),
    Pointer(PointerEvent),
    Key(KeyEvent),
    Zoom { direction: ZoomDirection },
    /// Wheel-style zoom around a surface point.
    ZoomAt { position: Point, factor: f64 },
    Resize { width: f64, height: f64 },
}

pub fn parse(json: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

/// Apply one step. Returns true if the canvas changed.
pub fn apply_step(canvas: &mut Canvas, step: &Step) -> bool {
    let before = canvas.revision();
    match step {
        Step::Tool { tool } => canvas.set_tool(*tool),
        Step::Style(patch) => {
            let mut style = canvas.style.clone();
            if let Some(color) = &patch.color {
                style.color = color.clone();
            }
            if let Some(fill) = &patch.fill_color {
                style.fill_color = fill.clone();
            }
            if let Some(width) = patch.stroke_width {
                style.stroke_width = width;
            }
            if let Some(size) = patch.font_size {
                style.font_size = size;
            }
            canvas.set_style(style);
        }
        Step::Pointer(event) => {
            canvas.handle_pointer(*event);
        }
        Step::Key(event) => {
            canvas.handle_key(event);
        }
        Step::Zoom { direction } => match direction {
            ZoomDirection::In => canvas.zoom_in(),
            ZoomDirection::Out => canvas.zoom_out(),
            ZoomDirection::Reset => canvas.reset_view(),
        },
        Step::ZoomAt { position, factor } => canvas.zoom_at(*position, *factor),
        Step::Resize { width, height } => canvas.set_viewport_size(*width, *height),
    }
    canvas.revision() != before
}

/// Apply every step in order, then commit anything still in progress.
/// Returns how many steps changed the canvas.
pub fn replay(canvas: &mut Canvas, steps: &[Step]) -> usize {
    let changed = steps
        .iter()
        .filter(|step| apply_step(canvas, step))
        .count();
    canvas.commit_pending();
    log::debug!("Replayed {} step(s), {} changed the canvas", steps.len(), changed);
    changed
}
