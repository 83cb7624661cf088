//! Seam to the external block editor.
//!
//! The editing itself (caret, selection, undo, inline formatting) belongs to
//! the editor library. This crate only needs to create an editor inside a
//! [`MountPoint`], pull [`BlockDocument`]s out of it, push blocks into it and
//! release it again. [`EditorBackend`] and [`EditorHandle`] describe exactly
//! that surface; [`memory`] provides an in-process implementation.

mod config;
pub mod memory;

pub use config::{EditorConfig, ToolRegistration, ToolSettings};
pub use memory::{Faults, MemoryBackend, MemoryEditor};

use std::future::Future;

use crate::document::{Block, BlockDocument};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("Editor is unavailable: {0}")]
    Unavailable(String),
    #[error("Editor rejected {operation}: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },
    #[error("Editor has been destroyed")]
    Destroyed,
}

/// Creates editors. One backend can create many editors over its lifetime,
/// but each page owns at most one of them at a time.
pub trait EditorBackend {
    type Handle: EditorHandle;

    /// Create an editor inside `mount`. Resolves once the editor is ready.
    fn initialize(
        &self,
        mount: &mut MountPoint,
        config: &EditorConfig,
    ) -> impl Future<Output = Result<Self::Handle, EditorError>>;
}

/// A live editor instance
pub trait EditorHandle {
    /// Capture the current content
    fn save(&self) -> impl Future<Output = Result<BlockDocument, EditorError>>;

    /// Append a block after the existing ones
    fn insert_block(&self, block: Block) -> impl Future<Output = Result<(), EditorError>>;

    /// Remove every block
    fn clear(&self) -> impl Future<Output = Result<(), EditorError>>;

    /// Replace the content with `document`
    fn render(&self, document: &BlockDocument) -> impl Future<Output = Result<(), EditorError>>;

    /// Release the editor. Destroying twice is not an error.
    fn destroy(&self) -> impl Future<Output = Result<(), EditorError>>;
}

/// Host container an editor draws into
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountPoint {
    id: String,
    widgets: Vec<String>,
}

impl MountPoint {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            widgets: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn attach(&mut self, widget: impl Into<String>) {
        self.widgets.push(widget.into());
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
    }

    pub fn widgets(&self) -> &[String] {
        &self.widgets
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}
