//! File manager and editor session on top of a [`CanvasStore`].

use crate::canvas::Canvas;
use crate::shapes::Element;
use crate::store::{CanvasFile, CanvasStore, FileId, StoreError, StoreResult};
use std::sync::Arc;

/// Which screen the session is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Document list.
    Manager,
    /// A document is open on the canvas.
    Editor,
}

/// Answer to the "delete this file?" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient, dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// A save captured from the editor, ready to send.
///
/// Carries the session generation so a late completion can be recognized.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub file_id: FileId,
    pub generation: u64,
    pub data: Vec<Element>,
}

/// File manager plus the open document.
///
/// Failed operations leave files and scene as they were and queue an
/// error [`Notice`]; nothing is retried.
pub struct Session<S: CanvasStore + ?Sized> {
    store: Arc<S>,
    files: Vec<CanvasFile>,
    current: Option<FileId>,
    canvas: Canvas,
    view: View,
    notices: Vec<Notice>,
    /// Bumped whenever the open document changes.
    generation: u64,
}

impl<S: CanvasStore + ?Sized> Session<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            files: Vec::new(),
            current: None,
            canvas: Canvas::new(),
            view: View::Manager,
            notices: Vec::new(),
            generation: 0,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// Cached document list, as of the last refresh plus local edits.
    pub fn files(&self) -> &[CanvasFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&CanvasFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// The document open in the editor.
    pub fn current_file(&self) -> Option<&CanvasFile> {
        self.current.and_then(|id| self.file(id))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove and return all pending notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Dismiss one notice by index.
    pub fn dismiss(&mut self, index: usize) {
        if index < self.notices.len() {
            self.notices.remove(index);
        }
    }

    fn info(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        });
    }

    fn fail(&mut self, action: &str, error: &StoreError) {
        log::error!("Failed to {}: {}", action, error);
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message: format!("Failed to {}: {}", action, error),
        });
    }

    /// Fetch the document list.
    pub async fn refresh(&mut self) -> bool {
        match self.store.list().await {
            Ok(files) => {
                log::debug!("Fetched {} document(s)", files.len());
                self.files = files;
                true
            }
            Err(e) => {
                self.fail("fetch files", &e);
                false
            }
        }
    }

    /// Create an empty document and open it. Blank names are not sent.
    pub async fn create(&mut self, name: &str) -> Option<FileId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        match self.store.create(name).await {
            Ok(file) => {
                let id = file.id;
                log::info!("Created document {} ({})", file.name, id);
                self.files.insert(0, file);
                self.enter_editor(id, Vec::new());
                Some(id)
            }
            Err(e) => {
                self.fail("create file", &e);
                None
            }
        }
    }

    /// Open a listed document in the editor with a fresh view.
    pub fn open(&mut self, id: FileId) -> bool {
        let Some(file) = self.file(id) else {
            self.fail("open file", &StoreError::NotFound(id.to_string()));
            return false;
        };
        let data = file.data.clone();
        self.enter_editor(id, data);
        true
    }

    fn enter_editor(&mut self, id: FileId, data: Vec<Element>) {
        self.generation += 1;
        self.canvas.load(data);
        self.current = Some(id);
        self.view = View::Editor;
    }

    /// Leave the editor. Unsaved edits are discarded.
    pub fn close(&mut self) {
        self.generation += 1;
        self.canvas.load(Vec::new());
        self.current = None;
        self.view = View::Manager;
    }

    /// Capture the open document for saving. `None` when nothing is open.
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        let file_id = self.current?;
        self.canvas.commit_pending();
        Some(SaveRequest {
            file_id,
            generation: self.generation,
            data: self.canvas.elements().to_vec(),
        })
    }

    /// Apply a save completion.
    ///
    /// The cached copy of the file takes the saved elements and the user is
    /// told it was saved. A completion from an earlier generation never
    /// touches the editor.
    pub fn finish_save(&mut self, request: SaveRequest, result: StoreResult<CanvasFile>) -> bool {
        if let Err(e) = result {
            self.fail("save file", &e);
            return false;
        }

        if request.generation != self.generation {
            log::warn!(
                "Save of {} completed after the editor moved on; updating list only",
                request.file_id
            );
        } else {
            log::info!("Saved document {}", request.file_id);
        }
        if let Some(file) = self.files.iter_mut().find(|f| f.id == request.file_id) {
            file.data = request.data;
        }
        self.info("Saved!");
        true
    }

    /// Save the open document. Does nothing when no document is open.
    pub async fn save(&mut self) -> bool {
        let Some(request) = self.begin_save() else {
            return false;
        };
        let result = self.store.update(request.file_id, &request.data).await;
        self.finish_save(request, result)
    }

    /// Delete a document after the user confirmed.
    ///
    /// Deleting the open document returns to the manager.
    pub async fn delete(&mut self, id: FileId, confirmation: Confirmation) -> bool {
        if confirmation != Confirmation::Confirmed {
            return false;
        }
        match self.store.delete(id).await {
            Ok(()) => {
                log::info!("Deleted document {}", id);
                self.files.retain(|f| f.id != id);
                if self.current == Some(id) {
                    self.close();
                }
                true
            }
            Err(e) => {
                self.fail("delete file", &e);
                false
            }
        }
    }
}
