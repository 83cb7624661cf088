//! In-process editor.
//!
//! Behaves like a browser block editor as far as the page can observe: every
//! call suspends once before completing, inserts are checked against the
//! registered tools, and inserted blocks get an id. Failures can be switched
//! on through [`Faults`] to exercise error paths.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use super::{EditorBackend, EditorConfig, EditorError, EditorHandle, MountPoint, ToolSettings};
use crate::document::{Block, BlockContent, BlockDocument};

/// Version string reported in saved documents
pub const MEMORY_EDITOR_VERSION: &str = concat!("blockview-memory-", env!("CARGO_PKG_VERSION"));

const WIDGET: &str = "memory-editor";
const BLOCK_ID_LEN: usize = 10;

/// Switches that make the next calls of an operation fail
#[derive(Debug, Default)]
pub struct Faults {
    pub initialize: Cell<bool>,
    pub save: Cell<bool>,
    pub insert: Cell<bool>,
    pub clear: Cell<bool>,
    pub destroy: Cell<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    faults: Rc<Faults>,
    created: Rc<Cell<usize>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault switches shared with every editor this backend creates
    pub fn faults(&self) -> Rc<Faults> {
        Rc::clone(&self.faults)
    }

    pub fn editors_created(&self) -> usize {
        self.created.get()
    }
}

impl EditorBackend for MemoryBackend {
    type Handle = MemoryEditor;

    async fn initialize(
        &self,
        mount: &mut MountPoint,
        config: &EditorConfig,
    ) -> Result<MemoryEditor, EditorError> {
        yield_now().await;
        if self.faults.initialize.get() {
            return Err(EditorError::Unavailable(
                "editor library failed to load".to_string(),
            ));
        }

        mount.attach(WIDGET);
        self.created.set(self.created.get() + 1);
        log::debug!("memory editor created in mount point '{}'", mount.id());

        Ok(MemoryEditor {
            config: config.clone(),
            faults: Rc::clone(&self.faults),
            blocks: RefCell::new(with_ids(config.initial_data.blocks.clone())),
            destroyed: Cell::new(false),
        })
    }
}

#[derive(Debug)]
pub struct MemoryEditor {
    config: EditorConfig,
    faults: Rc<Faults>,
    blocks: RefCell<Vec<Block>>,
    destroyed: Cell<bool>,
}

impl MemoryEditor {
    /// Current content without going through `save`
    pub fn blocks(&self) -> Vec<Block> {
        self.blocks.borrow().clone()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn ensure_alive(&self) -> Result<(), EditorError> {
        if self.destroyed.get() {
            return Err(EditorError::Destroyed);
        }
        Ok(())
    }

    fn check_insertable(&self, block: &Block) -> Result<(), EditorError> {
        let block_type = block.block_type();
        let tool = self
            .config
            .tool(block_type)
            .ok_or_else(|| EditorError::Rejected {
                operation: "insert",
                reason: format!("no tool registered for block type '{block_type}'"),
            })?;

        if let (ToolSettings::Header { levels, .. }, BlockContent::Header(header)) =
            (&tool.settings, &block.content)
            && !levels.contains(&header.level)
        {
            return Err(EditorError::Rejected {
                operation: "insert",
                reason: format!("header level {} is not enabled", header.level.get()),
            });
        }

        Ok(())
    }
}

impl EditorHandle for MemoryEditor {
    async fn save(&self) -> Result<BlockDocument, EditorError> {
        yield_now().await;
        self.ensure_alive()?;
        if self.faults.save.get() {
            return Err(EditorError::Rejected {
                operation: "save",
                reason: "saver failed".to_string(),
            });
        }

        Ok(BlockDocument {
            time: now_millis(),
            blocks: self.blocks(),
            version: Some(MEMORY_EDITOR_VERSION.to_string()),
        })
    }

    async fn insert_block(&self, block: Block) -> Result<(), EditorError> {
        yield_now().await;
        self.ensure_alive()?;
        if self.faults.insert.get() {
            return Err(EditorError::Rejected {
                operation: "insert",
                reason: "insert failed".to_string(),
            });
        }
        self.check_insertable(&block)?;

        self.blocks.borrow_mut().push(with_id(block));
        Ok(())
    }

    async fn clear(&self) -> Result<(), EditorError> {
        yield_now().await;
        self.ensure_alive()?;
        if self.faults.clear.get() {
            return Err(EditorError::Rejected {
                operation: "clear",
                reason: "clear failed".to_string(),
            });
        }

        self.blocks.borrow_mut().clear();
        Ok(())
    }

    async fn render(&self, document: &BlockDocument) -> Result<(), EditorError> {
        yield_now().await;
        self.ensure_alive()?;

        *self.blocks.borrow_mut() = with_ids(document.blocks.clone());
        Ok(())
    }

    async fn destroy(&self) -> Result<(), EditorError> {
        yield_now().await;
        if self.destroyed.get() {
            return Ok(());
        }
        if self.faults.destroy.get() {
            return Err(EditorError::Rejected {
                operation: "destroy",
                reason: "destroy failed".to_string(),
            });
        }

        self.destroyed.set(true);
        self.blocks.borrow_mut().clear();
        Ok(())
    }
}

fn with_id(mut block: Block) -> Block {
    if block.id.is_none() {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(BLOCK_ID_LEN);
        block.id = Some(id);
    }
    block
}

fn with_ids(blocks: Vec<Block>) -> Vec<Block> {
    blocks.into_iter().map(with_id).collect()
}

fn now_millis() -> Option<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|elapsed| u64::try_from(elapsed.as_millis()).ok())
}

/// Suspend once, the way a call across to the browser would
fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }
        self.yielded = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HeadingLevel, ListStyle};
    use pollster::block_on;
    use pretty_assertions::assert_eq;

    fn editor() -> (MemoryBackend, MemoryEditor, MountPoint) {
        let backend = MemoryBackend::new();
        let mut mount = MountPoint::new("editor");
        let editor = block_on(backend.initialize(&mut mount, &EditorConfig::default())).unwrap();
        (backend, editor, mount)
    }

    #[test]
    fn initialize_attaches_widget_and_loads_initial_data() {
        let (backend, editor, mount) = editor();

        assert_eq!(mount.widgets(), &["memory-editor".to_string()]);
        assert_eq!(backend.editors_created(), 1);
        assert_eq!(editor.blocks().len(), BlockDocument::welcome().len());
        assert!(editor.blocks().iter().all(|block| block.id.is_some()));
    }

    #[test]
    fn initialize_fault_is_reported() {
        let backend = MemoryBackend::new();
        backend.faults().initialize.set(true);
        let mut mount = MountPoint::new("editor");

        let result = block_on(backend.initialize(&mut mount, &EditorConfig::default()));

        assert!(matches!(result, Err(EditorError::Unavailable(_))));
        assert!(mount.is_empty());
    }

    #[test]
    fn save_returns_a_detached_copy() {
        let (_backend, editor, _mount) = editor();
        let saved = block_on(editor.save()).unwrap();

        block_on(editor.insert_block(Block::paragraph("later"))).unwrap();

        assert_eq!(saved.len(), 4);
        assert_eq!(saved.version.as_deref(), Some(MEMORY_EDITOR_VERSION));
        assert!(saved.time.is_some());
        assert_eq!(block_on(editor.save()).unwrap().len(), 5);
    }

    #[test]
    fn insert_appends_with_generated_id() {
        let (_backend, editor, _mount) = editor();
        block_on(editor.insert_block(Block::list(ListStyle::Ordered, ["x"]))).unwrap();

        let last = editor.blocks().pop().unwrap();
        assert_eq!(last.block_type(), "list");
        assert_eq!(last.id.map(|id| id.len()), Some(10));
    }

    #[test]
    fn insert_of_unregistered_type_is_rejected() {
        let (_backend, editor, _mount) = editor();
        let err = block_on(editor.insert_block(Block::unknown("table", serde_json::json!({}))))
            .unwrap_err();
        assert!(err.to_string().contains("no tool registered for block type 'table'"));
    }

    #[test]
    fn insert_of_disabled_header_level_is_rejected() {
        let backend = MemoryBackend::new();
        let mut config = EditorConfig::default();
        if let ToolSettings::Header { levels, .. } = &mut config.tools[0].settings {
            levels.retain(|level| level.get() <= 3);
        }
        let mut mount = MountPoint::new("editor");
        let editor = block_on(backend.initialize(&mut mount, &config)).unwrap();

        let h4 = Block::header("x", HeadingLevel::new(4).unwrap());
        let h3 = Block::header("x", HeadingLevel::new(3).unwrap());

        assert!(block_on(editor.insert_block(h4)).is_err());
        assert!(block_on(editor.insert_block(h3)).is_ok());
    }

    #[test]
    fn clear_then_render_replaces_content() {
        let (_backend, editor, _mount) = editor();
        block_on(editor.clear()).unwrap();
        assert!(editor.blocks().is_empty());

        block_on(editor.render(&BlockDocument::placeholder())).unwrap();
        let blocks = editor.blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type(), "paragraph");
    }

    #[test]
    fn destroy_is_idempotent_and_final() {
        let (_backend, editor, _mount) = editor();

        block_on(editor.destroy()).unwrap();
        block_on(editor.destroy()).unwrap();

        assert!(editor.is_destroyed());
        assert_eq!(block_on(editor.save()), Err(EditorError::Destroyed));
        assert_eq!(
            block_on(editor.insert_block(Block::paragraph("x"))),
            Err(EditorError::Destroyed)
        );
    }

    #[test]
    fn save_fault_is_reported() {
        let (backend, editor, _mount) = editor();
        backend.faults().save.set(true);
        assert!(matches!(
            block_on(editor.save()),
            Err(EditorError::Rejected { operation: "save", .. })
        ));
    }
}
