use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;
use vischart_contracts::envelope::StrategyResult;

use super::{ChartRequest, ChartStrategy};
use crate::clients::ImageUploader;
use crate::config::RENDER_SERVICE_URL_ENV;
use crate::fallback::{first_success, Attempt, NotConfigured};
use crate::render::{ChartRenderer, EmbeddedImage, RenderSpec};

/// Stock charts: render in-process, fall back to the rendering service, then
/// upload whichever image came out.
pub struct LocalRenderStrategy {
    local: Arc<dyn ChartRenderer>,
    service: Option<Arc<dyn ChartRenderer>>,
    uploader: Arc<dyn ImageUploader>,
}

impl LocalRenderStrategy {
    pub fn new(
        local: Arc<dyn ChartRenderer>,
        service: Option<Arc<dyn ChartRenderer>>,
        uploader: Arc<dyn ImageUploader>,
    ) -> Self {
        Self {
            local,
            service,
            uploader,
        }
    }
}

impl ChartStrategy for LocalRenderStrategy {
    fn name(&self) -> &str {
        "local render"
    }

    fn produce(&self, request: &ChartRequest) -> Result<StrategyResult> {
        let spec = RenderSpec::from_arguments(request.kind, &request.validated);
        let fallback = match &self.service {
            Some(service) => Attempt::new("render service", || {
                render_contained(service.as_ref(), &spec)
            }),
            None => Attempt::new("render service", || {
                Err(anyhow!(NotConfigured(format!(
                    "no rendering service configured; set {RENDER_SERVICE_URL_ENV} to enable the fallback"
                ))))
            }),
        };
        let image = first_success(vec![
            Attempt::new("local render", || render_contained(self.local.as_ref(), &spec)),
            fallback,
        ])
        .context("Chart rendering failed")?;

        let url = self
            .uploader
            .upload(&image)
            .context("Image upload failed")?;
        info!(
            chart_type = request.kind.id(),
            bytes = image.bytes.len(),
            "chart rendered and uploaded"
        );
        Ok(StrategyResult::Url(url))
    }
}

/// Runs a renderer, turning a panic inside drawing code into an error so the
/// next attempt still runs.
fn render_contained(renderer: &dyn ChartRenderer, spec: &RenderSpec) -> Result<EmbeddedImage> {
    panic::catch_unwind(AssertUnwindSafe(|| renderer.render(spec))).unwrap_or_else(|payload| {
        Err(anyhow!(
            "renderer panicked: {}",
            panic_message(payload.as_ref())
        ))
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
