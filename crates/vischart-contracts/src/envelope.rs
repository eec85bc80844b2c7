use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One block of tool output. Text blocks carry `text`; other block types
/// (images, resources) keep their fields in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            extra: Map::new(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == "text" && self.text.is_some()
    }
}

/// Tool-shaped result as returned by the map service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolResult {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

/// Output of exactly one strategy per request.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyResult {
    Url(String),
    Tool(ToolResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub description: String,
    pub spec: Value,
}

/// The response returned for every tool call.
///
/// `is_error` is `Some(true)` exactly when a stage failed and is omitted
/// otherwise; `content` always holds at least one text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "isError", default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    #[serde(rename = "_meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<EnvelopeMeta>,
}

impl ResponseEnvelope {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(message)],
            is_error: Some(true),
            meta: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    pub fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find_map(|block| block.text.as_deref().filter(|_| block.is_text()))
    }
}
