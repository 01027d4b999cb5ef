//! Inkboard Core Library
//!
//! Platform-agnostic model for the inkboard annotation canvas: elements and
//! their wire format, the view transform, the tool state machine, document
//! stores and the file-manager session.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod input;
pub mod scene;
pub mod session;
pub mod shapes;
pub mod store;
pub mod tools;

pub use camera::Camera;
pub use canvas::Canvas;
pub use config::{Backend, Config, ConfigError};
pub use input::{KeyEvent, PointerEvent};
pub use scene::Scene;
pub use session::{Confirmation, Notice, NoticeLevel, SaveRequest, Session, View};
pub use shapes::{CssColor, Element};
pub use store::{CanvasFile, CanvasStore, FileId, StoreError, StoreResult};
pub use tools::{DrawingContext, TextEntry, ToolKind, ToolManager, ToolState};
