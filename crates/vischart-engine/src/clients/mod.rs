mod render_service;
mod upload;
mod vis_service;

use anyhow::{bail, Context, Result};
use reqwest::blocking::Response as HttpResponse;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::truncate_text;
use crate::render::EmbeddedImage;

pub use render_service::RenderServiceClient;
pub use upload::UploadClient;
pub use vis_service::VisServiceClient;

/// Reply shape shared by the chart and map endpoints.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ServiceReply {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "resultObj", default)]
    pub result_obj: Value,
}

pub trait ChartApi: Send + Sync {
    /// Posts `{type, ...args, source}` and returns the service reply.
    fn generate_chart(&self, body: &Value) -> Result<ServiceReply>;
}

pub trait MapApi: Send + Sync {
    /// Posts `{serviceId, tool, input, source}` and returns the service reply.
    fn generate_map(&self, body: &Value) -> Result<ServiceReply>;
}

pub trait ImageUploader: Send + Sync {
    /// Stores the image and returns its public URL.
    fn upload(&self, image: &EmbeddedImage) -> Result<String>;
}

fn response_json_or_error(service: &str, response: HttpResponse) -> Result<Value> {
    let status = response.status();
    let code = status.as_u16();
    let body = response
        .text()
        .with_context(|| format!("{service} response body read failed"))?;
    if !status.is_success() {
        bail!(
            "{service} request failed ({code}): {}",
            truncate_text(&body, 512)
        );
    }
    let parsed: Value = serde_json::from_str(&body)
        .with_context(|| format!("{service} returned invalid JSON payload"))?;
    Ok(parsed)
}

/// Short description of a request that never produced a response.
fn describe_transport_error(endpoint: &str, err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request to {endpoint} timed out")
    } else if err.is_connect() {
        format!("could not connect to {endpoint}")
    } else {
        format!("request to {endpoint} failed: {err}")
    }
}
