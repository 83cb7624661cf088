//! Toolbar commands that insert blocks into a live editor.
//!
//! Dispatch never fails from the caller's point of view: a missing editor
//! makes the command a no-op, and an editor error is logged and absorbed.
//! The inserted block shows up in the next `save()`.

use crate::document::{Block, HeadingLevel, ListStyle};
use crate::editor::EditorHandle;

pub const NEW_HEADER_TEXT: &str = "New Header";
pub const NEW_LIST_ITEM: &str = "New list item";
pub const NEW_QUOTE_TEXT: &str = "Enter your quote here";
pub const NEW_QUOTE_CAPTION: &str = "Quote author";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarCommand {
    InsertHeader(HeadingLevel),
    InsertList(ListStyle),
    InsertQuote,
}

impl ToolbarCommand {
    /// Block appended by this command
    pub fn default_block(self) -> Block {
        match self {
            ToolbarCommand::InsertHeader(level) => Block::header(NEW_HEADER_TEXT, level),
            ToolbarCommand::InsertList(style) => Block::list(style, [NEW_LIST_ITEM]),
            ToolbarCommand::InsertQuote => {
                Block::quote(NEW_QUOTE_TEXT, Some(NEW_QUOTE_CAPTION.to_string()))
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            ToolbarCommand::InsertHeader(level) => format!("Insert H{}", level.get()),
            ToolbarCommand::InsertList(ListStyle::Unordered) => "Insert Bullet List".to_string(),
            ToolbarCommand::InsertList(ListStyle::Ordered) => "Insert Numbered List".to_string(),
            ToolbarCommand::InsertQuote => "Insert Quote".to_string(),
        }
    }
}

/// Run `command` against `editor`, if there is one
pub async fn dispatch<E: EditorHandle>(editor: Option<&E>, command: ToolbarCommand) {
    let Some(editor) = editor else {
        log::debug!("{} ignored: no editor", command.label());
        return;
    };

    if let Err(e) = editor.insert_block(command.default_block()).await {
        log::error!("{} failed: {e}", command.label());
    }
}

pub async fn insert_header<E: EditorHandle>(editor: Option<&E>, level: HeadingLevel) {
    dispatch(editor, ToolbarCommand::InsertHeader(level)).await
}

pub async fn insert_list<E: EditorHandle>(editor: Option<&E>, style: ListStyle) {
    dispatch(editor, ToolbarCommand::InsertList(style)).await
}

pub async fn insert_quote<E: EditorHandle>(editor: Option<&E>) {
    dispatch(editor, ToolbarCommand::InsertQuote).await
}
