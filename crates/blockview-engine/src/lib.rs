pub mod document;
pub mod editor;
pub mod io;
pub mod page;
pub mod profile;
pub mod render;
pub mod toolbar;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use document::{
    Block, BlockContent, BlockDocument, DocumentError, HeadingLevel, ListItem, ListStyle,
};
pub use editor::{
    EditorBackend, EditorConfig, EditorError, EditorHandle, MemoryBackend, MemoryEditor,
    MountPoint,
};
pub use io::*;
pub use page::{EditorPage, PageError, PageState};
pub use profile::EditorProfile;
pub use render::{DisplayNode, Markup, render, to_html, to_text};
pub use toolbar::ToolbarCommand;
