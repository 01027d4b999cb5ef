//! Persistence for canvas documents.

mod file;
mod http;
mod memory;

pub use file::FileStore;
pub use http::HttpStore;
pub use memory::MemoryStore;

use crate::shapes::{Element, decode_elements};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Not authenticated")]
    Unauthorized,
    #[error("Document name must not be empty")]
    InvalidName,
    #[error("Request failed: {status} - {message}")]
    Http { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Server rejected request: {0}")]
    Rejected(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Boxed future for async store operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Server-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FileId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FileId)
    }
}

/// A saved canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasFile {
    pub id: FileId,
    pub name: String,
    /// Element list; `null` or absent loads as empty, unreadable entries are dropped.
    #[serde(default, deserialize_with = "lenient_elements")]
    pub data: Vec<Element>,
    /// Creation timestamp as sent by the server.
    #[serde(default)]
    pub created_at: String,
}

impl CanvasFile {
    /// Parse `created_at` for display. `None` if it is not RFC 3339.
    pub fn created_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

fn lenient_elements<'de, D>(deserializer: D) -> Result<Vec<Element>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(decode_elements(values.unwrap_or_default()))
}

/// Request body for creating a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRequest {
    pub name: String,
}

/// Request body for overwriting a document's elements.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub data: Vec<Element>,
}

/// Trim a document name, rejecting blank ones.
pub fn validate_name(name: &str) -> StoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName);
    }
    Ok(trimmed.to_string())
}

/// Trait for canvas document backends.
///
/// Every call either fully succeeds or leaves the stored documents unchanged.
pub trait CanvasStore: Send + Sync {
    /// All documents owned by the current user.
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<CanvasFile>>>;

    /// Create an empty document.
    fn create(&self, name: &str) -> BoxFuture<'_, StoreResult<CanvasFile>>;

    /// Overwrite a document's elements and return the stored record.
    fn update(&self, id: FileId, data: &[Element]) -> BoxFuture<'_, StoreResult<CanvasFile>>;

    /// Delete a document.
    fn delete(&self, id: FileId) -> BoxFuture<'_, StoreResult<()>>;
}

impl<S: CanvasStore + ?Sized> CanvasStore for Box<S> {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<CanvasFile>>> {
        (**self).list()
    }

    fn create(&self, name: &str) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        (**self).create(name)
    }

    fn update(&self, id: FileId, data: &[Element]) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        (**self).update(id, data)
    }

    fn delete(&self, id: FileId) -> BoxFuture<'_, StoreResult<()>> {
        (**self).delete(id)
    }
}
