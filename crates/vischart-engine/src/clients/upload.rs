use anyhow::{anyhow, Context, Result};
use reqwest::blocking::multipart::{Form as MultipartForm, Part as MultipartPart};
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

use super::{response_json_or_error, ImageUploader};
use crate::config::UPLOAD_SERVICE_URL_ENV;
use crate::render::EmbeddedImage;

/// Multipart uploader returning the stored file's public URL.
pub struct UploadClient {
    endpoint: Option<String>,
    http: HttpClient,
}

impl UploadClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            http: HttpClient::new(),
        }
    }
}

impl ImageUploader for UploadClient {
    fn upload(&self, image: &EmbeddedImage) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow!("upload service is not configured; set {UPLOAD_SERVICE_URL_ENV}"))?;
        let file_name = format!("chart.{}", image.extension());
        let part = MultipartPart::bytes(image.bytes.clone())
            .file_name(file_name)
            .mime_str(&image.mime_type)
            .with_context(|| format!("invalid image MIME type {}", image.mime_type))?;
        let form = MultipartForm::new().part("file", part);
        debug!(endpoint, bytes = image.bytes.len(), "uploading chart image");
        let response = self
            .http
            .post(endpoint)
            .multipart(form)
            .send()
            .with_context(|| format!("upload request failed ({endpoint})"))?;
        let payload = response_json_or_error("Upload service", response)?;
        payload
            .get("url")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Upload service response did not include a URL"))
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::json;

    use super::UploadClient;
    use crate::clients::test_server::serve_once;
    use crate::clients::ImageUploader;
    use crate::render::EmbeddedImage;

    fn image() -> EmbeddedImage {
        EmbeddedImage::new("image/png", vec![137, 80, 78, 71])
    }

    #[test]
    fn uploads_multipart_file_and_returns_url() -> Result<()> {
        let reply = json!({ "url": "https://cdn.local/chart.png" });
        let (endpoint, handle) = serve_once(200, "application/json", serde_json::to_vec(&reply)?);
        let url = UploadClient::new(Some(endpoint)).upload(&image())?;
        assert_eq!(url, "https://cdn.local/chart.png");

        let captured = handle.join().ok().flatten();
        let Some(captured) = captured else {
            panic!("server saw no request");
        };
        assert!(captured.content_type.starts_with("multipart/form-data"));
        let body = String::from_utf8_lossy(&captured.body);
        assert!(body.contains("name=\"file\""));
        assert!(body.contains("filename=\"chart.png\""));
        assert!(body.contains("image/png"));
        Ok(())
    }

    #[test]
    fn missing_url_is_an_error() -> Result<()> {
        let (endpoint, handle) = serve_once(200, "application/json", b"{\"url\":\"\"}".to_vec());
        let err = UploadClient::new(Some(endpoint)).upload(&image()).err();
        let message = err.map(|err| err.to_string()).unwrap_or_default();
        assert_eq!(message, "Upload service response did not include a URL");
        let _ = handle.join();
        Ok(())
    }

    #[test]
    fn unconfigured_endpoint_names_the_setting() {
        let err = UploadClient::new(None).upload(&image()).err();
        let message = err.map(|err| err.to_string()).unwrap_or_default();
        assert!(message.contains("UPLOAD_SERVICE_URL"));
    }
}
