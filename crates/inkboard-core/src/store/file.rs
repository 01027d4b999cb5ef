//! File-based store for local, offline documents.

use super::{BoxFuture, CanvasFile, CanvasStore, FileId, StoreError, StoreResult, validate_name};
use crate::shapes::Element;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stores each document as `<id>.json` in a directory.
///
/// New ids are one past the largest id on disk.
pub struct FileStore {
    /// Base directory for document storage.
    base_path: PathBuf,
    /// Serializes id allocation and writes.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StoreResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StoreError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// The default directory: `<data_local_dir>/inkboard/canvas`.
    pub fn default_dir() -> StoreResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StoreError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("inkboard").join("canvas"))
    }

    /// Create a file store in the default location.
    pub fn default_location() -> StoreResult<Self> {
        Self::new(Self::default_dir()?)
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn document_path(&self, id: FileId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    fn read_file(path: &Path) -> StoreResult<CanvasFile> {
        let json = fs::read_to_string(path).map_err(|e| {
            StoreError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            StoreError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn write_file(&self, file: &CanvasFile) -> StoreResult<()> {
        let path = self.document_path(file.id);
        let json = serde_json::to_string_pretty(file)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&path, json).map_err(|e| {
            StoreError::Io(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    /// Ids of every `<number>.json` file in the directory.
    fn ids(&self) -> StoreResult<Vec<FileId>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StoreError::Io(format!("Failed to read directory: {}", e)))?;

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<FileId>().ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|e| StoreError::Other(format!("Lock error: {}", e)))
    }
}

impl CanvasStore for FileStore {
    fn list(&self) -> BoxFuture<'_, StoreResult<Vec<CanvasFile>>> {
        Box::pin(async move {
            let mut ids = self.ids()?;
            // Newest first.
            ids.sort_unstable_by(|a, b| b.cmp(a));

            let mut files = Vec::with_capacity(ids.len());
            for id in ids {
                match Self::read_file(&self.document_path(id)) {
                    Ok(file) => files.push(file),
                    Err(e) => log::warn!("Skipping unreadable document {}: {}", id, e),
                }
            }
            Ok(files)
        })
    }

    fn create(&self, name: &str) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        let name = validate_name(name);
        Box::pin(async move {
            let name = name?;
            let _guard = self.lock()?;
            let next = self.ids()?.into_iter().map(|id| id.0).max().unwrap_or(0) + 1;
            let file = CanvasFile {
                id: FileId(next),
                name,
                data: Vec::new(),
                created_at: chrono::Utc::now().to_rfc3339(),
            };
            self.write_file(&file)?;
            log::info!("Created {}", self.document_path(file.id).display());
            Ok(file)
        })
    }

    fn update(&self, id: FileId, data: &[Element]) -> BoxFuture<'_, StoreResult<CanvasFile>> {
        let data = data.to_vec();
        Box::pin(async move {
            let _guard = self.lock()?;
            let path = self.document_path(id);
            if !path.exists() {
                return Err(StoreError::NotFound(id.to_string()));
            }
            let mut file = Self::read_file(&path)?;
            file.data = data;
            self.write_file(&file)?;
            Ok(file)
        })
    }

    fn delete(&self, id: FileId) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let _guard = self.lock()?;
            let path = self.document_path(id);
            if !path.exists() {
                return Err(StoreError::NotFound(id.to_string()));
            }
            fs::remove_file(&path).map_err(|e| {
                StoreError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{CssColor, RectElement};
    use kurbo::Point;
    use pollster::block_on;
    use tempfile::tempdir;

    fn boxed() -> Vec<Element> {
        vec![Element::Rect(RectElement::new(
            Point::new(50.0, 50.0),
            -20.0,
            -20.0,
            CssColor::new("#ff0000"),
            Some(CssColor::transparent()),
            3.0,
        ))]
    }

    #[test]
    fn test_file_store_create_update_list() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();

        let a = block_on(store.create("Plan")).unwrap();
        let b = block_on(store.create("Sketch")).unwrap();
        assert_eq!(a.id, FileId(1));
        assert_eq!(b.id, FileId(2));

        block_on(store.update(a.id, &boxed())).unwrap();

        let list = block_on(store.list()).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Sketch");
        assert_eq!(list[1].data, boxed());
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = FileStore::new(dir.path().to_path_buf()).unwrap();
            let file = block_on(store.create("kept")).unwrap();
            block_on(store.update(file.id, &boxed())).unwrap();
        }
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let list = block_on(store.list()).unwrap();
        assert_eq!(list[0].data, boxed());
        assert_eq!(block_on(store.create("next")).unwrap().id, FileId(2));
    }

    #[test]
    fn test_file_store_not_found() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(matches!(block_on(store.update(FileId(5), &[])), Err(StoreError::NotFound(_))));
        assert!(matches!(block_on(store.delete(FileId(5))), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_file_store_delete() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        let file = block_on(store.create("gone")).unwrap();
        block_on(store.delete(file.id)).unwrap();
        assert!(block_on(store.list()).unwrap().is_empty());
    }

    #[test]
    fn test_file_store_ignores_foreign_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::write(dir.path().join("draft.json"), "{}").unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(block_on(store.list()).unwrap().is_empty());
        assert_eq!(block_on(store.create("a")).unwrap().id, FileId(1));
    }

    #[test]
    fn test_file_store_skips_corrupt_document() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("3.json"), "not json").unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).unwrap();
        assert!(block_on(store.list()).unwrap().is_empty());
        // The corrupt file still reserves its id.
        assert_eq!(block_on(store.create("a")).unwrap().id, FileId(4));
    }
}
