use std::sync::Arc;

use anyhow::{bail, Result};
use serde_json::{Map, Value};
use tracing::info;
use vischart_contracts::envelope::StrategyResult;

use super::{reply_error, ChartRequest, ChartStrategy};
use crate::clients::ChartApi;

/// Generic charts: the Chart API renders and hosts the image.
pub struct RemoteChartStrategy {
    api: Arc<dyn ChartApi>,
    source: String,
}

impl RemoteChartStrategy {
    pub fn new(api: Arc<dyn ChartApi>, source: impl Into<String>) -> Self {
        Self {
            api,
            source: source.into(),
        }
    }
}

impl ChartStrategy for RemoteChartStrategy {
    fn name(&self) -> &str {
        "remote chart"
    }

    fn produce(&self, request: &ChartRequest) -> Result<StrategyResult> {
        let mut body = Map::new();
        body.insert(
            "type".to_string(),
            Value::String(request.kind.id().to_string()),
        );
        for (key, value) in &request.validated {
            body.insert(key.clone(), value.clone());
        }
        body.insert("source".to_string(), Value::String(self.source.clone()));

        let reply = self.api.generate_chart(&Value::Object(body))?;
        if !reply.success {
            bail!(reply_error(reply.error_message, "chart generation failed"));
        }
        let Some(url) = reply
            .result_obj
            .as_str()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            bail!("Chart API returned no chart URL");
        };
        info!(chart_type = request.kind.id(), "remote chart generated");
        Ok(StrategyResult::Url(url.to_string()))
    }
}
