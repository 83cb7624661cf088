use html_escape::decode_html_entities;
use regex::Regex;
use std::sync::OnceLock;

use super::{DisplayNode, ListItemNode, Markup};
use crate::document::ListStyle;

static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
static TAG: OnceLock<Regex> = OnceLock::new();

/// Reduce inline markup to the text a reader would see
pub fn markup_to_text(markup: &Markup) -> String {
    let line_break =
        LINE_BREAK.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid line break regex"));
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

    let with_breaks = line_break.replace_all(markup.as_str(), "\n");
    let stripped = tag.replace_all(&with_breaks, "");
    decode_html_entities(&stripped).into_owned()
}

/// Terminal rendering: one entry per output line, a blank line after each block
pub fn to_text(nodes: &[DisplayNode]) -> Vec<String> {
    let mut lines = Vec::new();

    for node in nodes {
        match node {
            DisplayNode::Heading { level, text } => {
                let prefix = "#".repeat(level.get() as usize);
                lines.push(format!("{prefix} {text}"));
            }
            DisplayNode::Paragraph(markup) => {
                lines.extend(markup_to_text(markup).lines().map(str::to_string));
            }
            DisplayNode::List { style, items } => push_items(*style, items, 0, &mut lines),
            DisplayNode::Blockquote { body, citation } => {
                for line in markup_to_text(body).lines() {
                    lines.push(format!("> {line}"));
                }
                if let Some(citation) = citation {
                    push_hanging(&markup_to_text(citation), "  — ", "    ", &mut lines);
                }
            }
            DisplayNode::Unsupported { block_type } => {
                lines.push(format!("[{}]", DisplayNode::unsupported_label(block_type)));
            }
        }
        lines.push(String::new());
    }

    lines
}

fn push_items(style: ListStyle, items: &[ListItemNode], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (index, item) in items.iter().enumerate() {
        let marker = match style {
            ListStyle::Ordered => format!("{}.", index + 1),
            ListStyle::Unordered => "•".to_string(),
        };
        let hang = " ".repeat(marker.chars().count() + 1);
        push_hanging(
            &markup_to_text(&item.content),
            &format!("{indent}{marker} "),
            &format!("{indent}{hang}"),
            lines,
        );
        push_items(style, &item.children, depth + 1, lines);
    }
}

/// One entry per line of `text`, the first behind `lead`, the rest behind `hang`
fn push_hanging(text: &str, lead: &str, hang: &str, lines: &mut Vec<String>) {
    let mut text_lines = text.lines();
    lines.push(format!("{lead}{}", text_lines.next().unwrap_or_default()));
    lines.extend(text_lines.map(|line| format!("{hang}{line}")));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockDocument;
    use crate::render::render;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("<b>bold</b> text", "bold text")]
    #[case("a<br>b", "a\nb")]
    #[case("a<BR/>b", "a\nb")]
    #[case("Tom &amp; Jerry", "Tom & Jerry")]
    #[case("<a href=\"x\">link</a>", "link")]
    #[case("", "")]
    fn markup_reduction(#[case] markup: &str, #[case] expected: &str) {
        assert_eq!(markup_to_text(&Markup::trusted(markup)), expected);
    }

    #[test]
    fn line_breaks_in_items_and_captions_give_separate_lines() {
        let document: BlockDocument = serde_json::from_value(json!({ "blocks": [
            { "type": "list", "data": { "style": "ordered", "items": [
                "first<br>continued",
                { "content": "parent", "items": ["child<br/>more"] }
            ] } },
            { "type": "quote", "data": { "text": "a<br>b", "caption": "Name<br>Role" } }
        ] }))
        .unwrap();

        assert_eq!(
            to_text(&render(Some(&document))),
            vec![
                "1. first",
                "   continued",
                "2. parent",
                "  1. child",
                "     more",
                "",
                "> a",
                "> b",
                "  — Name",
                "    Role",
                "",
            ]
        );
    }

    #[test]
    fn full_document_as_text() {
        let document: BlockDocument = serde_json::from_value(json!({ "blocks": [
            { "type": "header", "data": { "text": "Title", "level": 3 } },
            { "type": "paragraph", "data": { "text": "Some <i>text</i>" } },
            { "type": "list", "data": { "style": "ordered", "items": [
                "one",
                { "content": "two", "items": ["two-a"] }
            ] } },
            { "type": "quote", "data": { "text": "Wise", "caption": "Someone" } },
            { "type": "table", "data": {} }
        ] }))
        .unwrap();

        assert_eq!(
            to_text(&render(Some(&document))),
            vec![
                "### Title",
                "",
                "Some text",
                "",
                "1. one",
                "2. two",
                "  1. two-a",
                "",
                "> Wise",
                "  — Someone",
                "",
                "[Unsupported block type: table]",
                "",
            ]
        );
    }

    #[test]
    fn unordered_items_use_bullets() {
        let document = BlockDocument::welcome();
        let lines = to_text(&render(Some(&document)));
        assert!(lines.contains(&"• Use keyboard shortcuts".to_string()));
    }
}
