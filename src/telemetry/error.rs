use std::io;
use std::time::Duration;

use opentelemetry_sdk::error::OTelSdkError;
use thiserror::Error;

/// Boxed cause of an exporter construction failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Startup failures. Any of these is fatal to the process.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("{exporter}: {source}")]
    Exporter {
        exporter: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("cannot init tracer resource: {0}")]
    Resource(String),

    #[error("telemetry is already initialized for this process")]
    AlreadyInitialized,
}

impl TelemetryError {
    pub(crate) fn exporter(exporter: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Exporter {
            exporter,
            source: source.into(),
        }
    }
}

/// Failure of one provider during halt. Never fatal.
#[derive(Debug, Error)]
pub enum ShutdownError {
    #[error("telemetry {provider} shutdown: {source}")]
    Provider {
        provider: &'static str,
        #[source]
        source: OTelSdkError,
    },

    #[error("telemetry {provider} shutdown: deadline of {budget:?} exceeded")]
    DeadlineExceeded {
        provider: &'static str,
        budget: Duration,
    },

    #[error("telemetry {provider} shutdown: task panicked")]
    Panicked { provider: &'static str },

    #[error("telemetry {provider} shutdown: cannot spawn thread: {source}")]
    Spawn {
        provider: &'static str,
        #[source]
        source: io::Error,
    },
}

impl ShutdownError {
    /// Name of the provider that failed
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Provider { provider, .. }
            | Self::DeadlineExceeded { provider, .. }
            | Self::Panicked { provider }
            | Self::Spawn { provider, .. } => provider,
        }
    }
}
