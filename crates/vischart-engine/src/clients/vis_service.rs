use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

use super::{describe_transport_error, response_json_or_error, ChartApi, MapApi, ServiceReply};
use crate::errors::DispatchError;

/// Client for the visualization request server. Chart and map generation
/// share one endpoint; the body shape tells them apart.
pub struct VisServiceClient {
    endpoint: String,
    http: HttpClient,
}

impl VisServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: HttpClient::new(),
        }
    }

    fn post(&self, service: &str, body: &Value) -> Result<ServiceReply> {
        debug!(endpoint = %self.endpoint, service, "posting generation request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(body)
            .send()
            .map_err(|err| DispatchError::Network(describe_transport_error(&self.endpoint, &err)))?;
        let payload = response_json_or_error(service, response)?;
        serde_json::from_value(payload)
            .with_context(|| format!("{service} returned an unexpected reply shape"))
    }
}

impl ChartApi for VisServiceClient {
    fn generate_chart(&self, body: &Value) -> Result<ServiceReply> {
        self.post("Chart API", body)
    }
}

impl MapApi for VisServiceClient {
    fn generate_map(&self, body: &Value) -> Result<ServiceReply> {
        self.post("Map API", body)
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use serde_json::{json, Value};

    use super::VisServiceClient;
    use crate::clients::test_server::{closed_endpoint, serve_once};
    use crate::clients::{ChartApi, MapApi};
    use crate::errors::DispatchError;

    #[test]
    fn chart_request_posts_json_and_parses_reply() -> Result<()> {
        let reply = json!({ "success": true, "resultObj": "http://x/y.png" });
        let (endpoint, handle) = serve_once(200, "application/json", serde_json::to_vec(&reply)?);
        let client = VisServiceClient::new(endpoint);

        let parsed = client.generate_chart(&json!({ "type": "line", "data": [] }))?;
        assert!(parsed.success);
        assert_eq!(parsed.result_obj, json!("http://x/y.png"));
        assert!(parsed.error_message.is_none());

        let captured = handle.join().ok().flatten();
        let Some(captured) = captured else {
            panic!("server saw no request");
        };
        assert_eq!(captured.method, "POST");
        assert!(captured.content_type.starts_with("application/json"));
        let sent: Value = serde_json::from_slice(&captured.body)?;
        assert_eq!(sent["type"], json!("line"));
        Ok(())
    }

    #[test]
    fn map_reply_keeps_error_message() -> Result<()> {
        let reply = json!({ "success": false, "errorMessage": "quota exceeded" });
        let (endpoint, handle) = serve_once(200, "application/json", serde_json::to_vec(&reply)?);
        let parsed = VisServiceClient::new(endpoint).generate_map(&json!({ "tool": "x" }))?;
        assert!(!parsed.success);
        assert_eq!(parsed.error_message.as_deref(), Some("quota exceeded"));
        assert_eq!(parsed.result_obj, Value::Null);
        let _ = handle.join();
        Ok(())
    }

    #[test]
    fn http_errors_carry_status_and_body() {
        let (endpoint, handle) = serve_once(502, "text/plain", b"bad gateway".to_vec());
        let err = VisServiceClient::new(endpoint)
            .generate_chart(&json!({}))
            .err()
            .map(|err| err.to_string())
            .unwrap_or_default();
        assert_eq!(err, "Chart API request failed (502): bad gateway");
        let _ = handle.join();
    }

    #[test]
    fn connection_failures_are_network_errors() {
        let endpoint = closed_endpoint();
        let err = VisServiceClient::new(endpoint.clone()).generate_chart(&json!({}));
        let Err(err) = err else {
            panic!("expected a connection failure");
        };
        let network = err.downcast_ref::<DispatchError>();
        assert!(matches!(network, Some(DispatchError::Network(_))));
        assert!(err.to_string().starts_with("Failed to generate chart URL: "));
        assert!(err.to_string().contains(&endpoint));
    }
}
