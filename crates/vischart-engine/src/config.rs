use std::env;
use std::time::Duration;

use vischart_contracts::charts::DisabledTools;

pub const DEFAULT_VIS_REQUEST_SERVER: &str = "https://antv-studio.alipay.com/api/gpt-vis";
pub const DEFAULT_SOURCE: &str = "vischart-dispatch";
pub const RENDER_SERVICE_TIMEOUT: Duration = Duration::from_secs(30);

pub const VIS_REQUEST_SERVER_ENV: &str = "VIS_REQUEST_SERVER";
pub const SERVICE_ID_ENV: &str = "SERVICE_ID";
pub const RENDER_SERVICE_URL_ENV: &str = "RENDER_SERVICE_URL";
pub const UPLOAD_SERVICE_URL_ENV: &str = "UPLOAD_SERVICE_URL";
pub const DISABLED_TOOLS_ENV: &str = "DISABLED_TOOLS";

/// Process-wide service settings, built once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Endpoint used for both chart and map generation.
    pub vis_request_server: String,
    pub service_id: Option<String>,
    /// External rendering service used when local rendering fails.
    pub render_service_url: Option<String>,
    pub upload_url: Option<String>,
    pub disabled_tools: DisabledTools,
    /// Origin tag sent with every chart and map request.
    pub source: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            vis_request_server: DEFAULT_VIS_REQUEST_SERVER.to_string(),
            service_id: None,
            render_service_url: None,
            upload_url: None,
            disabled_tools: DisabledTools::default(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            vis_request_server: lookup(VIS_REQUEST_SERVER_ENV)
                .map(|value| normalize_url(&value))
                .unwrap_or(defaults.vis_request_server),
            service_id: lookup(SERVICE_ID_ENV),
            render_service_url: lookup(RENDER_SERVICE_URL_ENV).map(|value| normalize_url(&value)),
            upload_url: lookup(UPLOAD_SERVICE_URL_ENV).map(|value| normalize_url(&value)),
            disabled_tools: lookup(DISABLED_TOOLS_ENV)
                .map(|value| DisabledTools::parse(&value))
                .unwrap_or_default(),
            source: defaults.source,
        }
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
