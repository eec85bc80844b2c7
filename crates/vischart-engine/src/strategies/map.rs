use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use tracing::info;
use vischart_contracts::envelope::{StrategyResult, ToolResult};

use super::{reply_error, ChartRequest, ChartStrategy};
use crate::clients::MapApi;

/// District, path and pin maps. The Map API answers with a tool-shaped result.
pub struct MapStrategy {
    api: Arc<dyn MapApi>,
    service_id: Option<String>,
    source: String,
}

impl MapStrategy {
    pub fn new(api: Arc<dyn MapApi>, service_id: Option<String>, source: impl Into<String>) -> Self {
        Self {
            api,
            service_id,
            source: source.into(),
        }
    }
}

impl ChartStrategy for MapStrategy {
    fn name(&self) -> &str {
        "map"
    }

    fn produce(&self, request: &ChartRequest) -> Result<StrategyResult> {
        let tool = request.kind.map_tool_name();
        let mut body = Map::new();
        if let Some(service_id) = &self.service_id {
            body.insert("serviceId".to_string(), Value::String(service_id.clone()));
        }
        body.insert("tool".to_string(), Value::String(tool.clone()));
        body.insert("input".to_string(), Value::Object(request.validated.clone()));
        body.insert("source".to_string(), Value::String(self.source.clone()));

        let reply = self.api.generate_map(&Value::Object(body))?;
        if !reply.success {
            bail!(reply_error(reply.error_message, "map generation failed"));
        }
        let Value::Object(mut result) = reply.result_obj else {
            bail!("Map API returned no result object");
        };
        // Internal bookkeeping; never forwarded.
        result.remove("metadata");
        let result: ToolResult = serde_json::from_value(Value::Object(result))
            .context("Map API returned a malformed tool result")?;
        if result.content.is_empty() {
            bail!("Map API returned an empty result");
        }
        info!(tool = %tool, blocks = result.content.len(), "map generated");
        Ok(StrategyResult::Tool(result))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use serde_json::{json, Map, Value};
    use vischart_contracts::charts::ChartKind;
    use vischart_contracts::envelope::StrategyResult;

    use super::MapStrategy;
    use crate::clients::ServiceReply;
    use crate::strategies::fakes::RecordingApi;
    use crate::strategies::{ChartRequest, ChartStrategy};

    fn request(kind: ChartKind) -> ChartRequest {
        let validated = json!({ "title": "Stops", "data": ["Hangzhou"] });
        ChartRequest {
            kind,
            arguments: Map::new(),
            validated: validated.as_object().cloned().unwrap_or_default(),
        }
    }

    fn success(result_obj: Value) -> ServiceReply {
        ServiceReply {
            success: true,
            error_message: None,
            result_obj,
        }
    }

    #[test]
    fn forwards_rewritten_tool_and_strips_metadata() -> Result<()> {
        let api = Arc::new(RecordingApi::replying(success(json!({
            "metadata": { "trace": "abc" },
            "content": [{ "type": "text", "text": "https://map/1" }]
        }))));
        let strategy = MapStrategy::new(api.clone(), Some("svc-1".to_string()), "vischart-dispatch");
        let result = strategy.produce(&request(ChartKind::PinMap))?;

        let StrategyResult::Tool(tool) = result else {
            panic!("expected a tool result");
        };
        assert_eq!(tool.content.len(), 1);
        assert_eq!(tool.content[0].text.as_deref(), Some("https://map/1"));
        assert!(!tool.is_error);
        assert!(tool.content[0].extra.get("metadata").is_none());

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0]["tool"], json!("generate_pin_map"));
        assert_eq!(calls[0]["serviceId"], json!("svc-1"));
        assert_eq!(calls[0]["input"]["title"], json!("Stops"));
        assert_eq!(calls[0]["source"], json!("vischart-dispatch"));
        Ok(())
    }

    #[test]
    fn omits_service_id_when_unset() -> Result<()> {
        let api = Arc::new(RecordingApi::replying(success(json!({
            "content": [{ "type": "text", "text": "ok" }]
        }))));
        MapStrategy::new(api.clone(), None, "src").produce(&request(ChartKind::DistrictMap))?;
        let calls = api.calls();
        assert!(calls[0].get("serviceId").is_none());
        assert_eq!(calls[0]["tool"], json!("generate_district_map"));
        Ok(())
    }

    #[test]
    fn unsuccessful_reply_without_message_is_generic() {
        let api = Arc::new(RecordingApi::replying(ServiceReply::default()));
        let err = MapStrategy::new(api, None, "src")
            .produce(&request(ChartKind::PathMap))
            .err()
            .map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("map generation failed"));
    }

    #[test]
    fn empty_content_is_an_error() {
        let api = Arc::new(RecordingApi::replying(success(json!({ "content": [] }))));
        let err = MapStrategy::new(api, None, "src")
            .produce(&request(ChartKind::PinMap))
            .err()
            .map(|err| err.to_string());
        assert_eq!(err.as_deref(), Some("Map API returned an empty result"));
    }

    #[test]
    fn tool_level_errors_are_forwarded() -> Result<()> {
        let api = Arc::new(RecordingApi::replying(success(json!({
            "content": [{ "type": "text", "text": "no such district" }],
            "isError": true
        }))));
        let result = MapStrategy::new(api, None, "src").produce(&request(ChartKind::DistrictMap))?;
        let StrategyResult::Tool(tool) = result else {
            panic!("expected a tool result");
        };
        assert!(tool.is_error);
        Ok(())
    }
}
