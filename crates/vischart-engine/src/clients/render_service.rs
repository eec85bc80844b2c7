use anyhow::{bail, Context, Result};
use reqwest::blocking::Client as HttpClient;

use crate::config::RENDER_SERVICE_TIMEOUT;
use crate::errors::truncate_text;
use crate::render::{ChartRenderer, EmbeddedImage, RenderSpec};

/// External rendering service used when in-process rendering fails.
pub struct RenderServiceClient {
    endpoint: String,
    http: HttpClient,
}

impl RenderServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(RENDER_SERVICE_TIMEOUT)
            .build()
            .context("failed to build render service HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }
}

impl ChartRenderer for RenderServiceClient {
    fn render(&self, spec: &RenderSpec) -> Result<EmbeddedImage> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("Accept", "image/*")
            .json(&spec.to_payload())
            .send()
            .with_context(|| format!("render service request failed ({})", self.endpoint))?;
        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            bail!(
                "render service request failed ({status_code}): {}",
                truncate_text(&body, 512)
            );
        }
        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_ascii_lowercase())
            .filter(|value| value.starts_with("image/"))
            .unwrap_or_else(|| "image/png".to_string());
        let bytes = response
            .bytes()
            .context("failed reading render service image bytes")?
            .to_vec();
        if bytes.is_empty() {
            bail!("render service returned an empty image");
        }
        Ok(EmbeddedImage::new(mime_type, bytes))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::{json, Value};
    use vischart_contracts::charts::ChartKind;

    use super::RenderServiceClient;
    use crate::clients::test_server::serve_once;
    use crate::render::{ChartRenderer, RenderSpec};

    fn spec() -> RenderSpec {
        let args = json!({
            "data": [{ "date": "2024-01-02", "open": 1, "high": 2, "low": 0.5, "close": 1.5 }]
        });
        let args = args.as_object().cloned().unwrap_or_default();
        RenderSpec::from_arguments(ChartKind::Candlestick, &args)
    }

    #[test]
    fn returns_binary_body_as_image() -> Result<()> {
        let (endpoint, handle) = serve_once(200, "image/jpeg", vec![0xff, 0xd8, 0xff]);
        let image = RenderServiceClient::new(endpoint)?.render(&spec())?;
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, vec![0xff, 0xd8, 0xff]);

        let captured = handle.join().ok().flatten();
        let Some(captured) = captured else {
            panic!("server saw no request");
        };
        let sent: Value = serde_json::from_slice(&captured.body)?;
        assert_eq!(sent["type"], json!("candlestick"));
        assert_eq!(sent["width"], json!(800));
        assert_eq!(sent["theme"], json!("default"));
        Ok(())
    }

    #[test]
    fn non_image_content_type_defaults_to_png() -> Result<()> {
        let (endpoint, handle) = serve_once(200, "application/octet-stream", vec![1, 2, 3]);
        let image = RenderServiceClient::new(endpoint)?.render(&spec())?;
        assert_eq!(image.mime_type, "image/png");
        let _ = handle.join();
        Ok(())
    }

    #[test]
    fn failed_status_is_an_error() -> Result<()> {
        let (endpoint, handle) = serve_once(500, "text/plain", b"renderer crashed".to_vec());
        let err = RenderServiceClient::new(endpoint)?.render(&spec()).err();
        let message = err.map(|err| err.to_string()).unwrap_or_default();
        assert_eq!(message, "render service request failed (500): renderer crashed");
        let _ = handle.join();
        Ok(())
    }
}
