//! Application error type.

use crate::export::ExportError;
use crate::script::ScriptError;
use inkboard_core::config::ConfigError;
use inkboard_core::store::{FileId, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
    #[error("No document with id {0}")]
    UnknownDocument(FileId),
    /// An operation failed and the session reported why.
    #[error("{0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
