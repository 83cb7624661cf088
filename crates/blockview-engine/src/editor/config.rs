use crate::document::{BlockContent, BlockDocument, HeadingLevel, ListStyle};

/// Per-tool settings handed to the editor library
#[derive(Debug, Clone, PartialEq)]
pub enum ToolSettings {
    Header {
        placeholder: String,
        levels: Vec<HeadingLevel>,
        default_level: HeadingLevel,
    },
    Paragraph {
        placeholder: String,
    },
    List {
        default_style: ListStyle,
    },
    Quote {
        quote_placeholder: String,
        caption_placeholder: String,
    },
}

impl ToolSettings {
    /// The block `type` this tool produces
    pub fn block_type(&self) -> &'static str {
        match self {
            ToolSettings::Header { .. } => BlockContent::HEADER,
            ToolSettings::Paragraph { .. } => BlockContent::PARAGRAPH,
            ToolSettings::List { .. } => BlockContent::LIST,
            ToolSettings::Quote { .. } => BlockContent::QUOTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolRegistration {
    pub settings: ToolSettings,
    pub inline_toolbar: bool,
    pub shortcut: Option<String>,
}

impl ToolRegistration {
    pub fn block_type(&self) -> &'static str {
        self.settings.block_type()
    }
}

/// Everything the editor library needs at construction time
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    pub placeholder: String,
    pub tools: Vec<ToolRegistration>,
    pub initial_data: BlockDocument,
}

impl EditorConfig {
    pub fn tool(&self, block_type: &str) -> Option<&ToolRegistration> {
        self.tools.iter().find(|tool| tool.block_type() == block_type)
    }

    pub fn with_initial_data(mut self, initial_data: BlockDocument) -> Self {
        self.initial_data = initial_data;
        self
    }
}

impl Default for EditorConfig {
    /// Header, paragraph, list and quote tools with the welcome document
    fn default() -> Self {
        let all_levels = (1..=6).filter_map(HeadingLevel::new).collect();

        Self {
            placeholder: "Click here to start writing your content...".to_string(),
            tools: vec![
                ToolRegistration {
                    settings: ToolSettings::Header {
                        placeholder: "Enter a header".to_string(),
                        levels: all_levels,
                        default_level: HeadingLevel::DEFAULT,
                    },
                    inline_toolbar: false,
                    shortcut: Some("CMD+SHIFT+H".to_string()),
                },
                ToolRegistration {
                    settings: ToolSettings::Paragraph {
                        placeholder: "Start typing...".to_string(),
                    },
                    inline_toolbar: true,
                    shortcut: None,
                },
                ToolRegistration {
                    settings: ToolSettings::List {
                        default_style: ListStyle::Unordered,
                    },
                    inline_toolbar: true,
                    shortcut: Some("CMD+SHIFT+L".to_string()),
                },
                ToolRegistration {
                    settings: ToolSettings::Quote {
                        quote_placeholder: "Enter a quote".to_string(),
                        caption_placeholder: "Quote's author".to_string(),
                    },
                    inline_toolbar: true,
                    shortcut: Some("CMD+SHIFT+O".to_string()),
                },
            ],
            initial_data: BlockDocument::welcome(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registers_four_tools() {
        let config = EditorConfig::default();
        let types: Vec<&str> = config.tools.iter().map(ToolRegistration::block_type).collect();
        assert_eq!(types, vec!["header", "paragraph", "list", "quote"]);
    }

    #[test]
    fn header_tool_allows_every_level() {
        let config = EditorConfig::default();
        let Some(ToolRegistration {
            settings: ToolSettings::Header { levels, default_level, .. },
            ..
        }) = config.tool("header")
        else {
            panic!("header tool missing");
        };
        assert_eq!(levels.len(), 6);
        assert_eq!(*default_level, HeadingLevel::DEFAULT);
    }

    #[test]
    fn unknown_tool_lookup() {
        assert!(EditorConfig::default().tool("table").is_none());
    }
}
