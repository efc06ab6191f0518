//! Process-wide tracing and metrics bootstrap.
//!
//! Picks an exporter backend from the environment, builds tracer and meter
//! providers around it, publishes them through `opentelemetry::global`, and
//! hands back a [`Telemetry`] whose [`Telemetry::halt`] drains both providers
//! within a one second budget.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! let config = TelemetryConfig::from_env();
//! telemetry::logging::init_subscriber(&config)?;
//! let telemetry = telemetry::init_with_config(&config)?;
//!
//! // anywhere in the process
//! let tracer = opentelemetry::global::tracer("api");
//!
//! telemetry.halt().await;
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `OTEL_EXPORTER` | `stdout`, `otlp`; anything else disables | disabled |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | OTLP collector endpoint | `http://localhost:4317` |
//! | `OTEL_SERVICE_NAME` | Service name | `api` |
//! | `OTEL_SERVICE_VERSION` | Service version | `CARGO_PKG_VERSION` |
//! | `RUST_LOG` | Log level filter | `info` |
//! | `LOG_FORMAT` | `pretty` or `json` | `pretty` |
//!
//! # Module Structure
//!
//! - [`api`]: initialization and the [`Telemetry`] handle
//! - [`build_info`]: compile-time build metadata
//! - [`config`]: configuration types
//! - [`error`]: error types
//! - [`exporter`]: backend selection and exporter construction
//! - [`logging`]: log subscriber, also the sink for OpenTelemetry internal errors
//! - [`registry`]: one-shot publication of the global providers
//! - [`resource`]: resource attributes
//! - [`shutdown`]: concurrent, deadline-bounded halt

pub mod api;
pub mod build_info;
pub mod config;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod registry;
pub mod resource;
pub mod shutdown;

pub use api::{build_providers, init, init_with_config, Telemetry};
pub use build_info::{BuildInfo, BuildSetting};
pub use config::{LogFormat, TelemetryConfig, TelemetryConfigBuilder};
pub use error::{ShutdownError, TelemetryError};
pub use exporter::{ExporterKind, ExporterPair, JsonMetricExporter, UnknownExporter};
pub use resource::ResourceDescriptor;
pub use shutdown::{Halt, HaltReport, HALT_BUDGET};
