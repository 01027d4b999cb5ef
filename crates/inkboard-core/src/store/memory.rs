//! In-memory store implementation.

use super::{BoxFuture, CanvasFile, CanvasStore, FileId, StoreError, StoreResult, validate_name};
use crate::shapes::Element;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    /// Newest first.
    files: Vec<CanvasFile>,
    last_id: i64,
}

/// In-memory store for testing and offline use.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with documents, listed in the given order.
    pub fn with_files(files: Vec<CanvasFile>) -> Self {
        let last_id = files.iter().map(|f| f.id.0).max().unwrap_or(0);
        Self {
            inner: RwLock::new(Inner { files, last_id }),
        }
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Other(format!("Lock error: {}", e))
}

impl CanvasStore for MemoryStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<CanvasFile>>> {
        Box::pin(async move {
            let inner = self.inner.read().map_err(lock_error)?;
            Ok(inner.files.clone())
        })
    }

    fn create(&self, name: &str) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        let name = validate_name(name);
        Box::pin(async move {
            let name = name?;
            let mut inner = self.inner.write().map_err(lock_error)?;
            inner.last_id += 1;
            let file = CanvasFile {
                id: FileId(inner.last_id),
                name,
                data: Vec::new(),
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            inner.files.insert(0, file.clone());
            Ok(file)
        })
    }

    fn update(&self, id: FileId, data: &[Element]) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        let data = data.to_vec();
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            let file = inner
                .files
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            file.data = data;
            Ok(file.clone())
        })
    }

    fn delete(&self, id: FileId) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.write().map_err(lock_error)?;
            let before = inner.files.len();
            inner.files.retain(|f| f.id != id);
            if inner.files.len() == before {
                return Err(StoreError::NotFound(id.to_string()));
            }
            Ok(())
        })
    }
}
