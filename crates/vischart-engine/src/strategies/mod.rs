mod local_render;
mod map;
mod remote_chart;

pub(crate) use local_render::panic_message;

use anyhow::Result;
use serde_json::{Map, Value};
use vischart_contracts::charts::ChartKind;
use vischart_contracts::envelope::StrategyResult;

pub use local_render::LocalRenderStrategy;
pub use map::MapStrategy;
pub use remote_chart::RemoteChartStrategy;

/// A resolved and validated request, ready for exactly one strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub kind: ChartKind,
    /// Arguments as the caller sent them.
    pub arguments: Map<String, Value>,
    /// Arguments after schema validation, with defaults applied.
    pub validated: Map<String, Value>,
}

pub trait ChartStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn produce(&self, request: &ChartRequest) -> Result<StrategyResult>;
}

fn reply_error(message: Option<String>, generic: &str) -> String {
    message
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| generic.to_string())
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use anyhow::{anyhow, Result};
    use serde_json::Value;

    use crate::clients::{ChartApi, ImageUploader, MapApi, ServiceReply};
    use crate::render::{ChartRenderer, EmbeddedImage, RenderSpec};

    /// Replays one canned reply and records every body it was sent.
    pub struct RecordingApi {
        reply: Result<ServiceReply, String>,
        pub bodies: Mutex<Vec<Value>>,
    }

    impl RecordingApi {
        pub fn replying(reply: ServiceReply) -> Self {
            Self {
                reply: Ok(reply),
                bodies: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                bodies: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<Value> {
            self.bodies.lock().map(|bodies| bodies.clone()).unwrap_or_default()
        }

        fn record(&self, body: &Value) -> Result<ServiceReply> {
            if let Ok(mut bodies) = self.bodies.lock() {
                bodies.push(body.clone());
            }
            self.reply.clone().map_err(|message| anyhow!(message))
        }
    }

    impl ChartApi for RecordingApi {
        fn generate_chart(&self, body: &Value) -> Result<ServiceReply> {
            self.record(body)
        }
    }

    impl MapApi for RecordingApi {
        fn generate_map(&self, body: &Value) -> Result<ServiceReply> {
            self.record(body)
        }
    }

    pub struct FakeRenderer {
        outcome: Result<EmbeddedImage, String>,
        pub specs: Mutex<Vec<RenderSpec>>,
    }

    impl FakeRenderer {
        pub fn succeeding(mime_type: &str) -> Self {
            Self {
                outcome: Ok(EmbeddedImage::new(mime_type, vec![1, 2, 3])),
                specs: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                specs: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.specs.lock().map(|specs| specs.len()).unwrap_or_default()
        }
    }

    impl ChartRenderer for FakeRenderer {
        fn render(&self, spec: &RenderSpec) -> Result<EmbeddedImage> {
            if let Ok(mut specs) = self.specs.lock() {
                specs.push(spec.clone());
            }
            self.outcome.clone().map_err(|message| anyhow!(message))
        }
    }

    /// Fails the way a drawing library without a text backend does.
    pub struct PanickingRenderer;

    impl ChartRenderer for PanickingRenderer {
        fn render(&self, _spec: &RenderSpec) -> Result<EmbeddedImage> {
            panic!("unable to draw text");
        }
    }

    /// Chart API whose client code panics mid-request.
    pub struct PanickingApi;

    impl ChartApi for PanickingApi {
        fn generate_chart(&self, _body: &Value) -> Result<ServiceReply> {
            panic!("client bug");
        }
    }

    pub struct FakeUploader {
        outcome: Result<String, String>,
        pub uploads: Mutex<Vec<EmbeddedImage>>,
    }

    impl FakeUploader {
        pub fn returning(url: &str) -> Self {
            Self {
                outcome: Ok(url.to_string()),
                uploads: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                outcome: Err(message.to_string()),
                uploads: Mutex::new(Vec::new()),
            }
        }

        pub fn uploaded(&self) -> Vec<EmbeddedImage> {
            self.uploads.lock().map(|uploads| uploads.clone()).unwrap_or_default()
        }
    }

    impl ImageUploader for FakeUploader {
        fn upload(&self, image: &EmbeddedImage) -> Result<String> {
            if let Ok(mut uploads) = self.uploads.lock() {
                uploads.push(image.clone());
            }
            self.outcome.clone().map_err(|message| anyhow!(message))
        }
    }
}
