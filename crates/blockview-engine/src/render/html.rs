use html_escape::encode_text;

use super::{DisplayNode, ListItemNode};
use crate::document::ListStyle;

/// Serialise rendered nodes as HTML, one top-level element per line
pub fn to_html(nodes: &[DisplayNode]) -> String {
    nodes
        .iter()
        .map(|node| {
            let mut out = String::new();
            write_node(node, &mut out);
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_node(node: &DisplayNode, out: &mut String) {
    match node {
        DisplayNode::Heading { level, text } => {
            let level = level.get();
            out.push_str(&format!("<h{level}>{}</h{level}>", encode_text(text)));
        }
        DisplayNode::Paragraph(markup) => {
            out.push_str("<p>");
            out.push_str(markup.as_str());
            out.push_str("</p>");
        }
        DisplayNode::List { style, items } => write_list(*style, items, out),
        DisplayNode::Blockquote { body, citation } => {
            out.push_str("<blockquote><p>");
            out.push_str(body.as_str());
            out.push_str("</p>");
            if let Some(citation) = citation {
                out.push_str("<footer><cite>");
                out.push_str(citation.as_str());
                out.push_str("</cite></footer>");
            }
            out.push_str("</blockquote>");
        }
        DisplayNode::Unsupported { block_type } => {
            out.push_str("<div class=\"unsupported-block\">");
            out.push_str(&encode_text(&DisplayNode::unsupported_label(block_type)));
            out.push_str("</div>");
        }
    }
}

fn write_list(style: ListStyle, items: &[ListItemNode], out: &mut String) {
    let tag = match style {
        ListStyle::Ordered => "ol",
        ListStyle::Unordered => "ul",
    };
    out.push_str(&format!("<{tag}>"));
    for item in items {
        out.push_str("<li>");
        out.push_str(item.content.as_str());
        if !item.children.is_empty() {
            write_list(style, &item.children, out);
        }
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
}
