use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

use crate::telemetry::config::{LogFormat, TelemetryConfig};

/// Level admitted for OpenTelemetry's own diagnostics.
///
/// The SDK reports export and processor errors through `tracing` under
/// `opentelemetry*` targets; this subscriber is where they end up.
pub const OTEL_INTERNAL_DIRECTIVE: &str = "opentelemetry=warn";

/// Build the JSON fmt layer for structured logging
pub fn build_json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(std::io::stderr)
}

/// Build the pretty fmt layer for human-readable output (local dev)
pub fn build_pretty_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
}

/// Build the env filter from config
///
/// `config.log_level` already carries `RUST_LOG` when it is set. OpenTelemetry
/// internals are held at [`OTEL_INTERNAL_DIRECTIVE`] unless the level names an
/// `opentelemetry` directive of its own.
pub fn build_filter(config: &TelemetryConfig) -> EnvFilter {
    let level = config.log_level.trim();
    if level.contains("opentelemetry") {
        EnvFilter::new(level)
    } else if level.is_empty() {
        EnvFilter::new(format!("info,{OTEL_INTERNAL_DIRECTIVE}"))
    } else {
        EnvFilter::new(format!("{level},{OTEL_INTERNAL_DIRECTIVE}"))
    }
}

/// Install the global log subscriber.
///
/// Logs go to stderr so that stdout carries exporter output only.
pub fn init_subscriber(config: &TelemetryConfig) -> Result<(), TryInitError> {
    let filter = build_filter(config);

    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(build_pretty_layer())
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(build_json_layer())
            .try_init(),
    }
}
