//! Inkboard Application
//!
//! Command-line shell over the document session: list, create, inspect and
//! delete documents, replay scripted gestures into them, and export them to
//! PNG through a headless render.

pub mod args;
pub mod commands;
pub mod error;
pub mod export;
pub mod script;

pub use args::{Cli, Commands};
pub use error::AppError;
