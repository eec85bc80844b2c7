use thiserror::Error;
use vischart_contracts::charts::ResolveError;

use crate::fallback::FallbackExhausted;

/// Who is at fault for a failed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Caller,
    Validation,
    Upstream,
    Configuration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("{0}")]
    Validation(String),
    #[error("Failed to generate chart: {0}")]
    Generation(String),
    /// The request never produced a response.
    #[error("Failed to generate chart URL: {0}")]
    Network(String),
    #[error("Failed to generate chart: {0}")]
    Configuration(String),
}

impl DispatchError {
    pub fn fault(&self) -> Fault {
        match self {
            Self::Resolve(_) => Fault::Caller,
            Self::Validation(_) => Fault::Validation,
            Self::Generation(_) | Self::Network(_) => Fault::Upstream,
            Self::Configuration(_) => Fault::Configuration,
        }
    }

    /// Converts a strategy failure. Errors that are already dispatch errors keep
    /// their message; anything else becomes a generation failure.
    pub fn from_strategy(err: &anyhow::Error) -> Self {
        if let Some(existing) = err.downcast_ref::<DispatchError>() {
            return existing.clone();
        }
        let message = error_chain_text(err, 2000);
        let unconfigured = err.chain().any(|cause| {
            cause
                .downcast_ref::<FallbackExhausted>()
                .map(FallbackExhausted::missing_configuration)
                .unwrap_or(false)
        });
        if unconfigured {
            Self::Configuration(message)
        } else {
            Self::Generation(message)
        }
    }
}

pub(crate) fn error_chain_text(err: &anyhow::Error, max_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let text = cause.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if parts
            .last()
            .map(|existing| existing.contains(trimmed))
            .unwrap_or(false)
        {
            continue;
        }
        parts.push(trimmed.to_string());
    }
    if parts.is_empty() {
        return truncate_text(&err.to_string(), max_chars);
    }
    truncate_text(&parts.join(" | caused by: "), max_chars)
}

pub(crate) fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use anyhow::{anyhow, Context};
    use vischart_contracts::charts::ResolveError;

    use super::{error_chain_text, truncate_text, DispatchError, Fault};

    #[test]
    fn dispatch_errors_pass_through_verbatim() {
        let err = anyhow::Error::new(DispatchError::Validation(
            "Invalid parameters: data: required".to_string(),
        ));
        let converted = DispatchError::from_strategy(&err);
        assert_eq!(converted.to_string(), "Invalid parameters: data: required");
        assert_eq!(converted.fault(), Fault::Validation);
    }

    #[test]
    fn other_errors_get_generation_prefix() {
        let err = anyhow!("connection reset").context("Image upload failed");
        let converted = DispatchError::from_strategy(&err);
        assert_eq!(converted.fault(), Fault::Upstream);
        assert_eq!(
            converted.to_string(),
            "Failed to generate chart: Image upload failed | caused by: connection reset"
        );
    }

    #[test]
    fn network_errors_keep_their_own_prefix() {
        let err = anyhow::Error::new(DispatchError::Network(
            "could not connect to http://127.0.0.1:9".to_string(),
        ));
        let converted = DispatchError::from_strategy(&err);
        assert_eq!(converted.fault(), Fault::Upstream);
        assert_eq!(
            converted.to_string(),
            "Failed to generate chart URL: could not connect to http://127.0.0.1:9"
        );
    }

    #[test]
    fn resolve_errors_are_caller_faults() {
        let err = DispatchError::from(ResolveError::UnknownTool("x".to_string()));
        assert_eq!(err.fault(), Fault::Caller);
        assert_eq!(err.to_string(), "Unknown tool: x");
    }

    #[test]
    fn chain_text_skips_repeated_causes() {
        let err: anyhow::Result<()> = Err(anyhow!("timeout")).context("render service: timeout");
        let text = err.err().map(|err| error_chain_text(&err, 200)).unwrap_or_default();
        assert_eq!(text, "render service: timeout");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate_text("abcdef", 3), "abc…");
        assert_eq!(truncate_text("abc", 3), "abc");
    }
}
