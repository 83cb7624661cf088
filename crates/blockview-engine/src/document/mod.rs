//! Block document model.
//!
//! A [`BlockDocument`] is the value a block-styled editor hands back from
//! `save()`: an ordered sequence of typed [`Block`]s plus a timestamp and the
//! editor version. Order is display order. Documents are plain values, so a
//! captured snapshot never changes when the live editor does.

mod block;

pub use block::{
    Block, BlockContent, Header, HeadingLevel, List, ListItem, ListStyle, Paragraph, Quote,
    UnknownBlock,
};

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Invalid block document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Heading level {0} is outside 1..=6")]
    InvalidHeadingLevel(u8),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockDocument {
    /// Save time in milliseconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl BlockDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            time: None,
            blocks,
            version: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Two-space indented JSON for inspection
    pub fn to_pretty_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Starting content shown when an editor is first opened
    pub fn welcome() -> Self {
        Self::new(vec![
            Block::header("Welcome to Editor.js!", HeadingLevel::DEFAULT),
            Block::paragraph("Start typing your content here. You can:"),
            Block::list(
                ListStyle::Unordered,
                [
                    "Add headers (H1-H6)",
                    "Create paragraphs with rich text",
                    "Make ordered and unordered lists",
                    "Insert quotes with citations",
                    "Use keyboard shortcuts",
                ],
            ),
            Block::quote(
                "Editor.js is a block-styled editor with clean JSON output.",
                Some("EditorJS Team".to_string()),
            ),
        ])
    }

    /// The single block an editor is reset to after a clear
    pub fn placeholder() -> Self {
        Self::new(vec![Block::paragraph(
            "Start typing your new content here...",
        )])
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Block>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Block>>::deserialize(deserializer)?.unwrap_or_default())
}
