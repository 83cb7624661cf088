use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DocumentError;

/// Heading depth, always within `1..=6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const DEFAULT: HeadingLevel = HeadingLevel(2);

    pub fn new(level: u8) -> Option<Self> {
        (1..=6).contains(&level).then_some(Self(level))
    }

    /// Normalise a saved `level` value.
    ///
    /// Integral numbers in `1..=6` are kept, including float spellings such
    /// as `1.0`. Anything else (missing, `0`, negative, fractional, a string,
    /// out of range) falls back to [`HeadingLevel::DEFAULT`].
    pub fn from_value(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_number)
            .and_then(|number| {
                number.as_u64().or_else(|| {
                    number
                        .as_f64()
                        .filter(|level| level.fract() == 0.0 && (1.0..=6.0).contains(level))
                        .map(|level| level as u64)
                })
            })
            .and_then(|level| u8::try_from(level).ok())
            .and_then(Self::new)
            .unwrap_or(Self::DEFAULT)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = DocumentError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level).ok_or(DocumentError::InvalidHeadingLevel(level))
    }
}

/// Ordered (`<ol>`) or unordered (`<ul>`) list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ListStyle {
    Ordered,
    #[default]
    Unordered,
}

impl ListStyle {
    /// Only the exact string `"ordered"` selects an ordered list.
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("ordered") => ListStyle::Ordered,
            _ => ListStyle::Unordered,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ListStyle::Ordered => "ordered",
            ListStyle::Unordered => "unordered",
        }
    }
}

/// One entry of a list block. `content` is inline markup.
///
/// Flat lists save items as plain strings; nested lists save objects of the
/// form `{ "content": ..., "meta": ..., "items": [...] }`. Both shapes are
/// accepted and written back in the shape they were loaded in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub content: String,
    pub items: Vec<ListItem>,
    /// Other fields of an item saved as an object, `None` for plain strings
    pub extra: Option<Map<String, Value>>,
}

impl ListItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            items: Vec::new(),
            extra: None,
        }
    }

    pub fn with_items(mut self, items: Vec<ListItem>) -> Self {
        self.items = items;
        self
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(content) => Some(Self::new(content.clone())),
            Value::Object(fields) => Some(Self {
                content: text_field(fields.get("content")),
                items: parse_items(fields.get("items")),
                extra: Some(unmodelled(
                    Some(fields),
                    &[("content", Value::is_string), ("items", always)],
                )),
            }),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        if self.extra.is_none() && self.items.is_empty() {
            return Value::String(self.content.clone());
        }
        let mut fields = self.extra.clone().unwrap_or_default();
        put(&mut fields, "content", &self.content, text_field, || {
            Value::String(self.content.clone())
        });
        fields.insert("items".into(), items_value(&self.items));
        Value::Object(fields)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// Plain text, never interpreted as markup
    pub text: String,
    pub level: HeadingLevel,
    /// Saved fields not reproduced by the typed ones
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Inline markup as produced by the editor
    pub text: String,
    /// Saved fields not reproduced by the typed ones
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub style: ListStyle,
    pub items: Vec<ListItem>,
    /// Saved fields not reproduced by the typed ones
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub text: String,
    pub caption: Option<String>,
    /// Saved fields not reproduced by the typed ones
    pub extra: Map<String, Value>,
}

/// A block whose type has no dedicated variant. Kept verbatim so it
/// survives a save/load cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownBlock {
    pub block_type: String,
    pub data: Value,
}

/// Typed payload of a block, discriminated by the saved `type` string
#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    Header(Header),
    Paragraph(Paragraph),
    List(List),
    Quote(Quote),
    Unknown(UnknownBlock),
}

impl BlockContent {
    pub const HEADER: &'static str = "header";
    pub const PARAGRAPH: &'static str = "paragraph";
    pub const LIST: &'static str = "list";
    pub const QUOTE: &'static str = "quote";

    /// The `type` string this content saves under
    pub fn block_type(&self) -> &str {
        match self {
            BlockContent::Header(_) => Self::HEADER,
            BlockContent::Paragraph(_) => Self::PARAGRAPH,
            BlockContent::List(_) => Self::LIST,
            BlockContent::Quote(_) => Self::QUOTE,
            BlockContent::Unknown(unknown) => &unknown.block_type,
        }
    }

    /// Build typed content from a saved `type` and `data` pair.
    ///
    /// Malformed fields degrade to their empty value so that one bad block
    /// never prevents its siblings from loading. Fields the typed view does
    /// not reproduce exactly (tool options, `meta`, unusual list styles) are
    /// kept in `extra` and written back by [`BlockContent::to_data`]. The
    /// header level is the exception: it is always normalised.
    pub fn from_parts(block_type: &str, data: Value) -> Self {
        let fields = data.as_object();
        let field = |name: &str| fields.and_then(|f| f.get(name));

        match block_type {
            Self::HEADER => BlockContent::Header(Header {
                text: text_field(field("text")),
                level: HeadingLevel::from_value(field("level")),
                extra: unmodelled(fields, &[("text", Value::is_string), ("level", always)]),
            }),
            Self::PARAGRAPH => BlockContent::Paragraph(Paragraph {
                text: text_field(field("text")),
                extra: unmodelled(fields, &[("text", Value::is_string)]),
            }),
            Self::LIST => BlockContent::List(List {
                style: ListStyle::from_value(field("style")),
                items: parse_items(field("items")),
                extra: unmodelled(fields, &[("style", is_list_style), ("items", always)]),
            }),
            Self::QUOTE => BlockContent::Quote(Quote {
                text: text_field(field("text")),
                caption: field("caption").and_then(Value::as_str).map(str::to_string),
                extra: unmodelled(
                    fields,
                    &[("text", Value::is_string), ("caption", Value::is_string)],
                ),
            }),
            other => BlockContent::Unknown(UnknownBlock {
                block_type: other.to_string(),
                data,
            }),
        }
    }

    /// The `data` object this content saves as
    pub fn to_data(&self) -> Value {
        let fields = match self {
            BlockContent::Header(header) => {
                let mut fields = header.extra.clone();
                put_text(&mut fields, "text", &header.text);
                fields.insert("level".into(), Value::from(header.level.get()));
                fields
            }
            BlockContent::Paragraph(paragraph) => {
                let mut fields = paragraph.extra.clone();
                put_text(&mut fields, "text", &paragraph.text);
                fields
            }
            BlockContent::List(list) => {
                let mut fields = list.extra.clone();
                put(&mut fields, "style", &list.style, ListStyle::from_value, || {
                    Value::from(list.style.as_str())
                });
                fields.insert("items".into(), items_value(&list.items));
                fields
            }
            BlockContent::Quote(quote) => {
                let mut fields = quote.extra.clone();
                put_text(&mut fields, "text", &quote.text);
                if let Some(caption) = &quote.caption {
                    fields.insert("caption".into(), Value::String(caption.clone()));
                }
                fields
            }
            BlockContent::Unknown(unknown) => return unknown.data.clone(),
        };
        Value::Object(fields)
    }
}

/// A single block of a [`super::BlockDocument`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "RawBlock")]
pub struct Block {
    pub id: Option<String>,
    pub content: BlockContent,
    /// Block tune settings, carried through untouched
    pub tunes: Option<Value>,
}

impl Block {
    pub fn new(content: BlockContent) -> Self {
        Self {
            id: None,
            content,
            tunes: None,
        }
    }

    pub fn header(text: impl Into<String>, level: HeadingLevel) -> Self {
        Self::new(BlockContent::Header(Header {
            text: text.into(),
            level,
            extra: Map::new(),
        }))
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockContent::Paragraph(Paragraph {
            text: text.into(),
            extra: Map::new(),
        }))
    }

    pub fn list<I, S>(style: ListStyle, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(BlockContent::List(List {
            style,
            items: items.into_iter().map(ListItem::new).collect(),
            extra: Map::new(),
        }))
    }

    pub fn quote(text: impl Into<String>, caption: Option<String>) -> Self {
        Self::new(BlockContent::Quote(Quote {
            text: text.into(),
            caption,
            extra: Map::new(),
        }))
    }

    pub fn unknown(block_type: impl Into<String>, data: Value) -> Self {
        Self::new(BlockContent::Unknown(UnknownBlock {
            block_type: block_type.into(),
            data,
        }))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn block_type(&self) -> &str {
        self.content.block_type()
    }
}

impl From<Value> for Block {
    /// Anything that is not an object still becomes a block (of unknown,
    /// empty type) rather than failing the whole document.
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Block::unknown("", value);
        };

        let id = fields.get("id").and_then(Value::as_str).map(str::to_string);
        let block_type = text_field(fields.get("type"));
        let data = fields.remove("data").unwrap_or(Value::Null);
        let tunes = fields.remove("tunes");

        Block {
            id,
            content: BlockContent::from_parts(&block_type, data),
            tunes,
        }
    }
}

/// Wire shape of a block: `{ id?, type, data, tunes? }`
#[derive(Serialize)]
struct RawBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "type")]
    block_type: String,
    data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    tunes: Option<Value>,
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        RawBlock {
            id: block.id,
            block_type: block.content.block_type().to_string(),
            data: block.content.to_data(),
            tunes: block.tunes,
        }
    }
}

fn text_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn parse_items(value: Option<&Value>) -> Vec<ListItem> {
    match value {
        Some(Value::Array(entries)) => entries.iter().filter_map(ListItem::from_value).collect(),
        _ => Vec::new(),
    }
}

fn items_value(items: &[ListItem]) -> Value {
    Value::Array(items.iter().map(ListItem::to_value).collect())
}

fn always(_: &Value) -> bool {
    true
}

fn is_list_style(value: &Value) -> bool {
    matches!(value.as_str(), Some("ordered" | "unordered"))
}

/// Copy of `fields` without the named fields whose saved value the typed
/// view reproduces exactly
fn unmodelled(
    fields: Option<&Map<String, Value>>,
    exact: &[(&str, fn(&Value) -> bool)],
) -> Map<String, Value> {
    let mut extra = fields.cloned().unwrap_or_default();
    for (name, reproduced) in exact {
        if extra.get(*name).is_some_and(|value| reproduced(value)) {
            extra.remove(*name);
        }
    }
    extra
}

/// Write a typed field unless the kept saved value already reads back as it
fn put<T: PartialEq>(
    fields: &mut Map<String, Value>,
    name: &str,
    current: &T,
    read: impl Fn(Option<&Value>) -> T,
    encode: impl FnOnce() -> Value,
) {
    if fields
        .get(name)
        .is_some_and(|saved| read(Some(saved)) == *current)
    {
        return;
    }
    fields.insert(name.to_string(), encode());
}

fn put_text(fields: &mut Map<String, Value>, name: &str, text: &str) {
    put(fields, name, &text.to_string(), text_field, || {
        Value::String(text.to_string())
    });
}
