use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;
use vischart_contracts::charts::{
    list_tools, resolve_chart_kind, ChartKind, StrategyKind, ToolDescriptor, UNIFIED_TOOL_NAME,
};
use vischart_contracts::envelope::ResponseEnvelope;
use vischart_contracts::schema::{validate, ValidationOutcome};

use crate::clients::{
    ChartApi, ImageUploader, MapApi, RenderServiceClient, UploadClient, VisServiceClient,
};
use crate::config::ServiceConfig;
use crate::errors::{DispatchError, Fault};
use crate::normalize::normalize;
use crate::render::{CandlestickRenderer, ChartRenderer};
use crate::strategies::{
    panic_message, ChartRequest, ChartStrategy, LocalRenderStrategy, MapStrategy,
    RemoteChartStrategy,
};

/// Stages a request moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Validating,
    SelectingStrategy,
    Executing,
    Normalizing,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::Validating => "validating",
            Self::SelectingStrategy => "selecting_strategy",
            Self::Executing => "executing",
            Self::Normalizing => "normalizing",
        }
    }
}

type Staged<T> = std::result::Result<T, (Stage, DispatchError)>;

/// External services a dispatcher talks to.
pub struct Collaborators {
    pub chart_api: Arc<dyn ChartApi>,
    pub map_api: Arc<dyn MapApi>,
    pub local_renderer: Arc<dyn ChartRenderer>,
    pub render_service: Option<Arc<dyn ChartRenderer>>,
    pub uploader: Arc<dyn ImageUploader>,
}

impl Collaborators {
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let vis = Arc::new(VisServiceClient::new(config.vis_request_server.clone()));
        let render_service = match &config.render_service_url {
            Some(url) => {
                Some(Arc::new(RenderServiceClient::new(url.clone())?) as Arc<dyn ChartRenderer>)
            }
            None => None,
        };
        Ok(Self {
            chart_api: vis.clone(),
            map_api: vis,
            local_renderer: Arc::new(CandlestickRenderer),
            render_service,
            uploader: Arc::new(UploadClient::new(config.upload_url.clone())),
        })
    }
}

/// Turns `{tool name, arguments}` into a response envelope. Holds no
/// per-request state, so one instance serves concurrent callers.
pub struct Dispatcher {
    config: Arc<ServiceConfig>,
    remote_chart: RemoteChartStrategy,
    local_render: LocalRenderStrategy,
    map: MapStrategy,
}

impl Dispatcher {
    pub fn new(config: Arc<ServiceConfig>, collaborators: Collaborators) -> Self {
        let Collaborators {
            chart_api,
            map_api,
            local_renderer,
            render_service,
            uploader,
        } = collaborators;
        Self {
            remote_chart: RemoteChartStrategy::new(chart_api, config.source.clone()),
            local_render: LocalRenderStrategy::new(local_renderer, render_service, uploader),
            map: MapStrategy::new(map_api, config.service_id.clone(), config.source.clone()),
            config,
        }
    }

    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config)?;
        Ok(Self::new(Arc::new(config), collaborators))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        list_tools(&self.config.disabled_tools)
    }

    /// Never fails: every error becomes an envelope with `isError: true`.
    pub fn dispatch(&self, tool_name: &str, arguments: Map<String, Value>) -> ResponseEnvelope {
        let request_id = Uuid::new_v4();
        let span = info_span!("dispatch", %request_id, tool = tool_name);
        let _entered = span.enter();

        match self.run(tool_name, arguments) {
            Ok(envelope) => {
                info!(is_error = envelope.is_error(), "dispatch finished");
                envelope
            }
            Err((stage, err)) => {
                match err.fault() {
                    Fault::Caller | Fault::Validation => {
                        warn!(stage = stage.name(), error = %err, "request rejected")
                    }
                    Fault::Upstream | Fault::Configuration => {
                        error!(stage = stage.name(), error = %err, "chart generation failed")
                    }
                }
                ResponseEnvelope::error(err.to_string())
            }
        }
    }

    fn run(&self, tool_name: &str, arguments: Map<String, Value>) -> Staged<ResponseEnvelope> {
        debug!(stage = Stage::Resolving.name());
        let kind = resolve_chart_kind(tool_name, &arguments, &self.config.disabled_tools)
            .map_err(|err| (Stage::Resolving, DispatchError::from(err)))?;

        debug!(stage = Stage::Validating.name(), chart_type = kind.id());
        let validated = match kind.schema() {
            Some(schema) => match validate(schema, &arguments) {
                ValidationOutcome::Valid(validated) => validated,
                ValidationOutcome::Invalid(message) => {
                    return Err((Stage::Validating, DispatchError::Validation(message)))
                }
            },
            None => {
                let mut passthrough = arguments.clone();
                if tool_name == UNIFIED_TOOL_NAME {
                    passthrough.remove("type");
                }
                passthrough
            }
        };

        debug!(stage = Stage::SelectingStrategy.name());
        let strategy = self.strategy(kind);
        info!(
            chart_type = kind.id(),
            strategy = strategy.name(),
            "strategy selected"
        );

        debug!(stage = Stage::Executing.name());
        let request = ChartRequest {
            kind,
            arguments,
            validated,
        };
        let result = panic::catch_unwind(AssertUnwindSafe(|| strategy.produce(&request)))
            .unwrap_or_else(|payload| {
                Err(anyhow!(
                    "{} strategy panicked: {}",
                    strategy.name(),
                    panic_message(payload.as_ref())
                ))
            })
            .map_err(|err| (Stage::Executing, DispatchError::from_strategy(&err)))?;

        debug!(stage = Stage::Normalizing.name());
        Ok(normalize(kind, &request.arguments, result))
    }

    fn strategy(&self, kind: ChartKind) -> &dyn ChartStrategy {
        match kind.strategy() {
            StrategyKind::RemoteChart => &self.remote_chart,
            StrategyKind::LocalRender => &self.local_render,
            StrategyKind::Map => &self.map,
        }
    }
}
