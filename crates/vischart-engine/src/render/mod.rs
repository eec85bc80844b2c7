mod candlestick;

use anyhow::Result;
use serde_json::{json, Map, Value};
use vischart_contracts::charts::ChartKind;

pub use candlestick::CandlestickRenderer;

pub const DEFAULT_RENDER_WIDTH: u32 = 800;
pub const DEFAULT_RENDER_HEIGHT: u32 = 600;
pub const MAX_RENDER_DIMENSION: u32 = 4096;

/// Anything that turns chart parameters into a raster image: the in-process
/// renderer or the external rendering service.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, spec: &RenderSpec) -> Result<EmbeddedImage>;
}

/// Renderer parameters. Defaults are applied here rather than relying on the
/// validator, since arguments may arrive partially validated.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSpec {
    pub chart_type: String,
    pub data: Value,
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub style: Map<String, Value>,
    pub theme: String,
}

impl RenderSpec {
    pub fn from_arguments(kind: ChartKind, arguments: &Map<String, Value>) -> Self {
        Self {
            chart_type: kind.id().to_string(),
            data: arguments.get("data").cloned().unwrap_or(Value::Null),
            width: dimension(arguments.get("width"), DEFAULT_RENDER_WIDTH),
            height: dimension(arguments.get("height"), DEFAULT_RENDER_HEIGHT),
            title: arguments
                .get("title")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            style: arguments
                .get("style")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            theme: arguments
                .get("theme")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .unwrap_or("default")
                .to_string(),
        }
    }

    /// Request body for the external rendering service.
    pub fn to_payload(&self) -> Value {
        json!({
            "type": self.chart_type,
            "data": self.data,
            "width": self.width,
            "height": self.height,
            "title": self.title,
            "style": self.style,
            "theme": self.theme,
        })
    }
}

fn dimension(value: Option<&Value>, default: u32) -> u32 {
    let Some(raw) = value.and_then(Value::as_f64) else {
        return default;
    };
    if !raw.is_finite() || raw < 1.0 {
        return default;
    }
    (raw.round() as u32).min(MAX_RENDER_DIMENSION)
}

/// Encoded image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl EmbeddedImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// File extension used when uploading.
    pub fn extension(&self) -> &'static str {
        let lowered = self.mime_type.to_ascii_lowercase();
        if lowered.contains("jpeg") || lowered.contains("jpg") {
            return "jpg";
        }
        if lowered.contains("webp") {
            return "webp";
        }
        if lowered.contains("svg") {
            return "svg";
        }
        "png"
    }
}
