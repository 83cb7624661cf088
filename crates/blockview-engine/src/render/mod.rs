//! Block renderer.
//!
//! [`render`] turns a captured [`BlockDocument`] into a display tree. The
//! tree can then be serialised as HTML ([`to_html`]) or as terminal text
//! ([`to_text`]).
//!
//! ## Trusted markup
//!
//! Paragraph text, list items, quote bodies and captions are inline HTML
//! produced by the editor itself and are carried as [`Markup`], which is
//! emitted without escaping. This is not a sanitisation boundary: content from
//! an untrusted source must be cleaned before it reaches the renderer.
//! Heading text and unsupported type names are plain text and are escaped.

mod html;
mod text;

pub use html::to_html;
pub use text::{markup_to_text, to_text};

use crate::document::{Block, BlockContent, BlockDocument, HeadingLevel, ListItem, ListStyle};

/// Raw inline HTML taken from the editor's own output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Markup(String);

impl Markup {
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItemNode {
    pub content: Markup,
    /// Nested entries, rendered as a sub-list of the same style
    pub children: Vec<ListItemNode>,
}

/// One rendered block
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Heading {
        level: HeadingLevel,
        text: String,
    },
    Paragraph(Markup),
    List {
        style: ListStyle,
        items: Vec<ListItemNode>,
    },
    Blockquote {
        body: Markup,
        citation: Option<Markup>,
    },
    /// Placeholder for a block type with no renderer
    Unsupported {
        block_type: String,
    },
}

impl DisplayNode {
    pub const UNSUPPORTED_PREFIX: &'static str = "Unsupported block type: ";

    /// Visible text of the unsupported-block placeholder
    pub fn unsupported_label(block_type: &str) -> String {
        format!("{}{block_type}", Self::UNSUPPORTED_PREFIX)
    }
}

/// Render a document, one node per block, in document order.
///
/// A missing document renders as nothing.
pub fn render(document: Option<&BlockDocument>) -> Vec<DisplayNode> {
    document
        .map(|doc| render_blocks(&doc.blocks))
        .unwrap_or_default()
}

pub fn render_blocks(blocks: &[Block]) -> Vec<DisplayNode> {
    blocks.iter().map(render_block).collect()
}

pub fn render_block(block: &Block) -> DisplayNode {
    match &block.content {
        BlockContent::Header(header) => DisplayNode::Heading {
            level: header.level,
            text: header.text.clone(),
        },
        BlockContent::Paragraph(paragraph) => {
            DisplayNode::Paragraph(Markup::trusted(paragraph.text.clone()))
        }
        BlockContent::List(list) => DisplayNode::List {
            style: list.style,
            items: list_item_nodes(&list.items),
        },
        BlockContent::Quote(quote) => DisplayNode::Blockquote {
            body: Markup::trusted(quote.text.clone()),
            citation: quote
                .caption
                .as_deref()
                .filter(|caption| !caption.is_empty())
                .map(Markup::trusted),
        },
        BlockContent::Unknown(unknown) => DisplayNode::Unsupported {
            block_type: unknown.block_type.clone(),
        },
    }
}

fn list_item_nodes(items: &[ListItem]) -> Vec<ListItemNode> {
    items
        .iter()
        .map(|item| ListItemNode {
            content: Markup::trusted(item.content.clone()),
            children: list_item_nodes(&item.items),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn level(n: u8) -> HeadingLevel {
        HeadingLevel::new(n).unwrap()
    }

    fn doc(value: serde_json::Value) -> BlockDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn absent_document_renders_nothing() {
        assert!(render(None).is_empty());
    }

    #[test]
    fn empty_document_renders_nothing() {
        assert!(render(Some(&BlockDocument::default())).is_empty());
        assert!(render(Some(&doc(json!({ "blocks": [] })))).is_empty());
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    #[case(5)]
    #[case(6)]
    fn heading_depth_follows_level(#[case] n: u8) {
        let nodes = render(Some(&doc(json!({
            "blocks": [{ "type": "header", "data": { "text": "T", "level": n } }]
        }))));
        assert_eq!(
            nodes,
            vec![DisplayNode::Heading {
                level: level(n),
                text: "T".into()
            }]
        );
    }

    #[rstest]
    #[case(json!({ "text": "T" }))]
    #[case(json!({ "text": "T", "level": 0 }))]
    #[case(json!({ "text": "T", "level": 7 }))]
    #[case(json!({ "text": "T", "level": null }))]
    fn heading_depth_defaults_to_two(#[case] data: serde_json::Value) {
        let nodes = render(Some(&doc(json!({ "blocks": [{ "type": "header", "data": data }] }))));
        assert_eq!(
            nodes,
            vec![DisplayNode::Heading {
                level: level(2),
                text: "T".into()
            }]
        );
    }

    #[test]
    fn ordered_list_keeps_item_order() {
        let nodes = render(Some(&doc(json!({
            "blocks": [{ "type": "list", "data": { "style": "ordered", "items": ["a", "b"] } }]
        }))));
        let [DisplayNode::List { style, items }] = nodes.as_slice() else {
            panic!("expected a single list, got {nodes:?}");
        };
        assert_eq!(*style, ListStyle::Ordered);
        let contents: Vec<&str> = items.iter().map(|item| item.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b"]);
    }

    #[test]
    fn list_without_items_renders_empty_list() {
        let nodes = render(Some(&doc(json!({ "blocks": [{ "type": "list", "data": {} }] }))));
        assert_eq!(
            nodes,
            vec![DisplayNode::List {
                style: ListStyle::Unordered,
                items: Vec::new()
            }]
        );
    }

    #[rstest]
    #[case(json!({ "text": "q" }))]
    #[case(json!({ "text": "q", "caption": "" }))]
    #[case(json!({ "text": "q", "caption": null }))]
    fn quote_without_caption_has_no_citation(#[case] data: serde_json::Value) {
        let nodes = render(Some(&doc(json!({ "blocks": [{ "type": "quote", "data": data }] }))));
        assert_eq!(
            nodes,
            vec![DisplayNode::Blockquote {
                body: Markup::trusted("q"),
                citation: None
            }]
        );
    }

    #[test]
    fn quote_with_caption_has_one_citation() {
        let nodes = render(Some(&doc(json!({
            "blocks": [{ "type": "quote", "data": { "text": "q", "caption": "X" } }]
        }))));
        assert_eq!(
            nodes,
            vec![DisplayNode::Blockquote {
                body: Markup::trusted("q"),
                citation: Some(Markup::trusted("X"))
            }]
        );
    }

    #[test]
    fn unknown_type_renders_placeholder_between_siblings() {
        let nodes = render(Some(&doc(json!({ "blocks": [
            { "type": "paragraph", "data": { "text": "before" } },
            { "type": "table", "data": { "content": [] } },
            { "type": "paragraph", "data": { "text": "after" } }
        ] }))));

        assert_eq!(
            nodes,
            vec![
                DisplayNode::Paragraph(Markup::trusted("before")),
                DisplayNode::Unsupported {
                    block_type: "table".into()
                },
                DisplayNode::Paragraph(Markup::trusted("after")),
            ]
        );
        assert_eq!(
            DisplayNode::unsupported_label("table"),
            "Unsupported block type: table"
        );
    }

    #[test]
    fn duplicate_blocks_are_not_collapsed() {
        let document = BlockDocument::new(vec![Block::paragraph("same"), Block::paragraph("same")]);
        assert_eq!(render(Some(&document)).len(), 2);
    }

    #[test]
    fn rendering_is_repeatable() {
        let document = BlockDocument::welcome();
        assert_eq!(render(Some(&document)), render(Some(&document)));
    }
}
