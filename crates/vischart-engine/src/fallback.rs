use std::fmt;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use crate::errors::error_chain_text;

/// Raised by an attempt that cannot run because its service is not configured.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotConfigured(pub String);

/// One step of an ordered fallback chain.
pub struct Attempt<'a, T> {
    label: &'static str,
    run: Box<dyn FnOnce() -> Result<T> + 'a>,
}

impl<'a, T> Attempt<'a, T> {
    pub fn new(label: &'static str, run: impl FnOnce() -> Result<T> + 'a) -> Self {
        Self {
            label,
            run: Box::new(run),
        }
    }
}

#[derive(Debug)]
pub struct AttemptFailure {
    pub label: &'static str,
    pub error: anyhow::Error,
}

/// Every attempt failed; failures are kept in attempt order.
#[derive(Debug)]
pub struct FallbackExhausted {
    pub failures: Vec<AttemptFailure>,
}

impl FallbackExhausted {
    pub fn missing_configuration(&self) -> bool {
        self.failures
            .iter()
            .any(|failure| failure.error.downcast_ref::<NotConfigured>().is_some())
    }
}

impl fmt::Display for FallbackExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("no attempts were made");
        }
        let parts: Vec<String> = self
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.label, error_chain_text(&failure.error, 600)))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FallbackExhausted {}

/// Runs attempts in order and returns the first success. Later attempts only
/// run after every earlier one failed.
pub fn first_success<T>(attempts: Vec<Attempt<'_, T>>) -> Result<T, FallbackExhausted> {
    let mut failures = Vec::new();
    for attempt in attempts {
        match (attempt.run)() {
            Ok(value) => {
                debug!(attempt = attempt.label, "fallback attempt succeeded");
                return Ok(value);
            }
            Err(error) => {
                warn!(attempt = attempt.label, error = %error, "fallback attempt failed");
                failures.push(AttemptFailure {
                    label: attempt.label,
                    error,
                });
            }
        }
    }
    Err(FallbackExhausted { failures })
}
