//! Editor page lifecycle.
//!
//! An [`EditorPage`] owns exactly one editor for its whole life and moves
//! through
//!
//! ```text
//! Uninitialized -> Initializing -> Ready -> (Editing <-> Saved) -> Destroyed
//!                        \-> Failed -> Initializing (retry)
//! ```
//!
//! All methods take `&self` and the page is meant to be driven from a single
//! thread. Every `.await` is a call into the editor, and no internal borrow is
//! held across one, so a teardown can land while a save or an initialisation
//! is still in flight. When that happens the late result is dropped instead of
//! being written into the page.

use std::cell::RefCell;
use std::rc::Rc;

use crate::document::BlockDocument;
use crate::editor::{EditorBackend, EditorConfig, EditorError, EditorHandle, MountPoint};
use crate::render::{DisplayNode, render};
use crate::toolbar::{self, ToolbarCommand};

/// Observable lifecycle state of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Uninitialized,
    Initializing,
    Ready,
    Editing,
    Saved,
    Failed,
    Destroyed,
}

/// Errors shown to the user as a banner, or returned to a caller that
/// attempted an illegal transition
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PageError {
    #[error("Failed to load editor: {0}")]
    Initialization(EditorError),
    #[error("Failed to save content: {0}")]
    Save(EditorError),
    #[error("Editor is already initialized")]
    AlreadyInitialized,
    #[error("Page has been torn down")]
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Editing,
    Saved,
}

enum Lifecycle<H> {
    Uninitialized,
    Initializing,
    Active { editor: Rc<H>, phase: Phase },
    Failed,
    Destroyed,
}

impl<H> Lifecycle<H> {
    fn state(&self) -> PageState {
        match self {
            Lifecycle::Uninitialized => PageState::Uninitialized,
            Lifecycle::Initializing => PageState::Initializing,
            Lifecycle::Active { phase, .. } => match phase {
                Phase::Ready => PageState::Ready,
                Phase::Editing => PageState::Editing,
                Phase::Saved => PageState::Saved,
            },
            Lifecycle::Failed => PageState::Failed,
            Lifecycle::Destroyed => PageState::Destroyed,
        }
    }

    fn editor(&self) -> Option<Rc<H>> {
        match self {
            Lifecycle::Active { editor, .. } => Some(Rc::clone(editor)),
            _ => None,
        }
    }

    fn set_phase(&mut self, next: Phase) {
        if let Lifecycle::Active { phase, .. } = self {
            *phase = next;
        }
    }

    fn is_destroyed(&self) -> bool {
        matches!(self, Lifecycle::Destroyed)
    }
}

struct PageInner<H> {
    lifecycle: Lifecycle<H>,
    /// Latest content seen through a change notification or a submit
    live: Option<BlockDocument>,
    /// Snapshot captured by the last successful submit
    submitted: Option<BlockDocument>,
    banner: Option<PageError>,
}

pub struct EditorPage<B: EditorBackend> {
    backend: B,
    config: EditorConfig,
    inner: RefCell<PageInner<B::Handle>>,
}

impl<B: EditorBackend> EditorPage<B> {
    pub fn new(backend: B, config: EditorConfig) -> Self {
        Self {
            backend,
            config,
            inner: RefCell::new(PageInner {
                lifecycle: Lifecycle::Uninitialized,
                live: None,
                submitted: None,
                banner: None,
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Create the editor inside `mount`.
    ///
    /// Allowed once, from `Uninitialized`, or again after a failed attempt.
    /// Any other call, including a second call while the first is still in
    /// flight, is rejected. The mount point is emptied before the editor is
    /// created so that a remount never shows two editors.
    pub async fn initialize(&self, mount: &mut MountPoint) -> Result<(), PageError> {
        {
            let mut inner = self.inner.borrow_mut();
            match inner.lifecycle {
                Lifecycle::Uninitialized | Lifecycle::Failed => {}
                Lifecycle::Destroyed => return Err(PageError::Destroyed),
                Lifecycle::Initializing | Lifecycle::Active { .. } => {
                    log::debug!("Editor already initialized, skipping");
                    return Err(PageError::AlreadyInitialized);
                }
            }
            inner.lifecycle = Lifecycle::Initializing;
            inner.banner = None;
        }

        mount.clear();
        log::debug!("Mount point '{}' cleared, initializing editor", mount.id());
        let result = self.backend.initialize(mount, &self.config).await;

        let orphan = {
            let mut inner = self.inner.borrow_mut();
            match result {
                Ok(handle) if inner.lifecycle.is_destroyed() => handle,
                Ok(handle) => {
                    inner.lifecycle = Lifecycle::Active {
                        editor: Rc::new(handle),
                        phase: Phase::Ready,
                    };
                    log::info!("Editor is ready");
                    return Ok(());
                }
                Err(_) if inner.lifecycle.is_destroyed() => return Err(PageError::Destroyed),
                Err(e) => {
                    log::error!("Editor initialization error: {e}");
                    let error = PageError::Initialization(e);
                    inner.lifecycle = Lifecycle::Failed;
                    inner.banner = Some(error.clone());
                    return Err(error);
                }
            }
        };

        log::debug!("Page torn down during initialization, releasing new editor");
        if let Err(e) = orphan.destroy().await {
            log::warn!("Error destroying editor: {e}");
        }
        Err(PageError::Destroyed)
    }

    /// Change notification: pull the current content into the live view.
    /// Failures are logged only.
    pub async fn refresh_live_content(&self) {
        let Some(editor) = self.current_editor() else {
            return;
        };

        match editor.save().await {
            Ok(document) => {
                let mut inner = self.inner.borrow_mut();
                if inner.lifecycle.is_destroyed() {
                    return;
                }
                inner.live = Some(document);
                if inner.lifecycle.state() == PageState::Ready {
                    inner.lifecycle.set_phase(Phase::Editing);
                }
            }
            Err(e) => log::warn!("Live update failed: {e}"),
        }
    }

    /// Capture the editor content as the displayed snapshot.
    ///
    /// Without an editor this does nothing. A failed save shows a banner and
    /// leaves the previous snapshot in place.
    pub async fn submit(&self) -> Result<(), PageError> {
        let Some(editor) = self.current_editor() else {
            log::debug!("Submit ignored: no editor");
            return Ok(());
        };

        let result = editor.save().await;

        let mut inner = self.inner.borrow_mut();
        if inner.lifecycle.is_destroyed() {
            log::debug!("Discarding save result: page torn down");
            return Err(PageError::Destroyed);
        }

        match result {
            Ok(document) => {
                inner.live = Some(document.clone());
                inner.submitted = Some(document);
                inner.lifecycle.set_phase(Phase::Saved);
                if matches!(inner.banner, Some(PageError::Save(_))) {
                    inner.banner = None;
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Saving failed: {e}");
                let error = PageError::Save(e);
                inner.banner = Some(error.clone());
                Err(error)
            }
        }
    }

    /// Drop the snapshot and reset the editor to a single placeholder block.
    /// A torn-down page keeps its last snapshot.
    pub async fn clear(&self) {
        let editor = {
            let mut inner = self.inner.borrow_mut();
            if inner.lifecycle.is_destroyed() {
                log::debug!("Clear ignored: page torn down");
                return;
            }
            inner.submitted = None;
            inner.live = None;
            inner.lifecycle.set_phase(Phase::Editing);
            inner.lifecycle.editor()
        };
        let Some(editor) = editor else {
            return;
        };

        let reset = match editor.clear().await {
            Ok(()) => editor.render(&BlockDocument::placeholder()).await,
            Err(e) => Err(e),
        };
        if let Err(e) = reset {
            if self.state() == PageState::Destroyed {
                log::debug!("Clear interrupted by teardown: {e}");
            } else {
                log::error!("Clear failed: {e}");
            }
        }
    }

    /// Run a toolbar command against this page's editor
    pub async fn dispatch(&self, command: ToolbarCommand) {
        let editor = self.current_editor();
        toolbar::dispatch(editor.as_deref(), command).await;
    }

    /// Release the editor. Safe to call any number of times; the editor is
    /// destroyed by the first call only.
    pub async fn teardown(&self) {
        let previous = {
            let mut inner = self.inner.borrow_mut();
            std::mem::replace(&mut inner.lifecycle, Lifecycle::Destroyed)
        };

        match previous {
            Lifecycle::Active { editor, .. } => match editor.destroy().await {
                Ok(()) => log::debug!("Editor destroyed successfully"),
                Err(e) => log::warn!("Error during cleanup: {e}"),
            },
            Lifecycle::Destroyed => log::debug!("Teardown: already torn down"),
            _ => log::debug!("Teardown: no editor to release"),
        }
    }

    pub fn state(&self) -> PageState {
        self.inner.borrow().lifecycle.state()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.state(),
            PageState::Uninitialized | PageState::Initializing
        )
    }

    /// The toolbar is offered only while there is a live editor
    pub fn toolbar_enabled(&self) -> bool {
        matches!(
            self.state(),
            PageState::Ready | PageState::Editing | PageState::Saved
        )
    }

    pub fn live_content(&self) -> Option<BlockDocument> {
        self.inner.borrow().live.clone()
    }

    pub fn submitted(&self) -> Option<BlockDocument> {
        self.inner.borrow().submitted.clone()
    }

    pub fn rendered_submission(&self) -> Vec<DisplayNode> {
        render(self.inner.borrow().submitted.as_ref())
    }

    /// The submitted snapshot as pretty JSON, for inspection
    pub fn submitted_json(&self) -> Option<String> {
        let inner = self.inner.borrow();
        let document = inner.submitted.as_ref()?;
        match document.to_pretty_json() {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not serialise submitted content: {e}");
                None
            }
        }
    }

    pub fn error_banner(&self) -> Option<PageError> {
        self.inner.borrow().banner.clone()
    }

    fn current_editor(&self) -> Option<Rc<B::Handle>> {
        self.inner.borrow().lifecycle.editor()
    }
}
