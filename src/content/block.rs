//! Portable Text block tree
//!
//! The body of a post is a flat array of typed blocks. Text blocks carry
//! spans, mark definitions and optional list membership; other block types
//! (images, code) carry their own fields. Anything unrecognized, or a known
//! type whose fields do not decode, is kept as [`Block::Unknown`] so the
//! renderer can fall back instead of failing the whole post.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::post::{nullable, ImageRef};

/// One node of the rich-text body
#[derive(Debug, Clone)]
pub enum Block {
    Text(TextBlock),
    Image(ImageRef),
    Code(CodeBlock),
    Unknown { kind: String, raw: Value },
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        let kind = raw
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let block = match kind.as_str() {
            "block" => TextBlock::deserialize(&raw).ok().map(Block::Text),
            "image" => ImageRef::deserialize(&raw).ok().map(Block::Image),
            "code" => CodeBlock::deserialize(&raw).ok().map(Block::Code),
            _ => None,
        };

        Ok(block.unwrap_or(Block::Unknown { kind, raw }))
    }
}

/// A paragraph, heading, quote or list item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default = "default_style", deserialize_with = "style_or_default")]
    pub style: String,
    #[serde(default, deserialize_with = "nullable")]
    pub children: Vec<Span>,
    #[serde(default, deserialize_with = "nullable")]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
}

impl TextBlock {
    pub fn new(style: &str, children: Vec<Span>) -> Self {
        Self {
            style: style.to_string(),
            children,
            mark_defs: Vec::new(),
            list_item: None,
            level: None,
        }
    }

    /// Nesting depth for list items (1-based)
    pub fn list_level(&self) -> u32 {
        self.level.unwrap_or(1).max(1)
    }
}

fn default_style() -> String {
    "normal".to_string()
}

fn style_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_style))
}

/// Inline run of text with decorator and annotation marks
#[derive(Debug, Clone, Deserialize)]
pub struct Span {
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub marks: Vec<String>,
}

impl Span {
    pub fn plain(text: &str) -> Self {
        Self {
            kind: "span".to_string(),
            text: text.to_string(),
            marks: Vec::new(),
        }
    }

    pub fn marked(text: &str, marks: &[&str]) -> Self {
        Self {
            kind: "span".to_string(),
            text: text.to_string(),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Annotation definition referenced from span marks by key
#[derive(Debug, Clone, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key", default)]
    pub key: String,
    #[serde(rename = "_type", default)]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Source code block
#[derive(Debug, Clone, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub code: String,
}
