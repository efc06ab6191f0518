//! Exporter selection.
//!
//! `OTEL_EXPORTER` is classified into an [`ExporterKind`] by a pure function,
//! then [`ExporterPair`] constructs the matching span and metric exporters:
//!
//! | Value | Span exporter | Metric exporter |
//! |-------|---------------|-----------------|
//! | `stdout` | `opentelemetry_stdout` (human readable) | [`JsonMetricExporter`] on stdout |
//! | `otlp` | OTLP/gRPC, plaintext | OTLP/gRPC, plaintext |
//! | anything else | none (disabled, with a warning) | none |
//! | unset or empty | none (disabled) | none |
//!
//! The OTLP exporters connect to `OTEL_EXPORTER_OTLP_ENDPOINT`, falling back
//! to `http://localhost:4317`.

mod json_metrics;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::telemetry::error::{BoxError, TelemetryError};

pub use json_metrics::JsonMetricExporter;

/// Exporter backend chosen at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExporterKind {
    Stdout,
    Otlp,
    #[default]
    Disabled,
}

/// Non-empty `OTEL_EXPORTER` value naming no known backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown OTEL_EXPORTER value {0:?}")]
pub struct UnknownExporter(pub String);

impl FromStr for ExporterKind {
    type Err = UnknownExporter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stdout" => Ok(Self::Stdout),
            "otlp" => Ok(Self::Otlp),
            "" => Ok(Self::Disabled),
            other => Err(UnknownExporter(other.to_string())),
        }
    }
}

impl ExporterKind {
    /// Classify a raw configuration value. Absent and empty both disable.
    pub fn classify(raw: Option<&str>) -> Result<Self, UnknownExporter> {
        raw.map_or(Ok(Self::Disabled), str::parse)
    }

    /// Classify, degrading unknown values to [`ExporterKind::Disabled`] with a warning.
    pub fn select(raw: Option<&str>) -> Self {
        Self::classify(raw).unwrap_or_else(|err| {
            warn!(value = %err.0, "unknown OTEL_EXPORTER value");
            Self::Disabled
        })
    }

    pub fn is_enabled(self) -> bool {
        self != Self::Disabled
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Otlp => "otlp",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ExporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span exporter and a metric exporter, built together or not at all.
#[derive(Debug)]
pub struct ExporterPair<T, M> {
    pub trace: T,
    pub metric: M,
}

pub type StdoutExporters = ExporterPair<opentelemetry_stdout::SpanExporter, JsonMetricExporter>;

pub type OtlpExporters =
    ExporterPair<opentelemetry_otlp::SpanExporter, opentelemetry_otlp::MetricExporter>;

impl<T, M> ExporterPair<T, M> {
    /// Run both constructors in order.
    ///
    /// When the metric constructor fails the already built span exporter is
    /// dropped before the error is returned.
    pub fn try_build<FT, FM, ET, EM>(
        trace: (&'static str, FT),
        metric: (&'static str, FM),
    ) -> Result<Self, TelemetryError>
    where
        FT: FnOnce() -> Result<T, ET>,
        FM: FnOnce() -> Result<M, EM>,
        ET: Into<BoxError>,
        EM: Into<BoxError>,
    {
        let (trace_name, build_trace) = trace;
        let (metric_name, build_metric) = metric;

        let trace = build_trace().map_err(|e| TelemetryError::exporter(trace_name, e))?;
        let metric = build_metric().map_err(|e| TelemetryError::exporter(metric_name, e))?;
        Ok(Self { trace, metric })
    }
}

impl StdoutExporters {
    pub fn stdout() -> Result<Self, TelemetryError> {
        Self::try_build(
            ("stdouttrace", || {
                Ok::<_, BoxError>(opentelemetry_stdout::SpanExporter::default())
            }),
            ("stdoutmetric", || {
                Ok::<_, BoxError>(JsonMetricExporter::stdout())
            }),
        )
    }
}

impl OtlpExporters {
    /// Must run inside a Tokio runtime: the tonic channels connect lazily on it.
    pub fn otlp() -> Result<Self, TelemetryError> {
        Self::try_build(
            ("otlptracegrpc", || {
                opentelemetry_otlp::SpanExporter::builder()
                    .with_tonic()
                    .build()
            }),
            ("otlpmetricgrpc", || {
                opentelemetry_otlp::MetricExporter::builder()
                    .with_tonic()
                    .build()
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use super::*;

    struct DropWitness(Arc<AtomicBool>);

    impl Drop for DropWitness {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn classify_known_values() {
        assert_eq!(ExporterKind::classify(Some("stdout")), Ok(ExporterKind::Stdout));
        assert_eq!(ExporterKind::classify(Some("otlp")), Ok(ExporterKind::Otlp));
    }

    #[test]
    fn classify_absent_and_empty_disable() {
        assert_eq!(ExporterKind::classify(None), Ok(ExporterKind::Disabled));
        assert_eq!(ExporterKind::classify(Some("")), Ok(ExporterKind::Disabled));
    }

    #[test]
    fn classify_unknown_value_is_an_error() {
        assert_eq!(
            ExporterKind::classify(Some("bogus")),
            Err(UnknownExporter("bogus".to_string()))
        );
        assert!(ExporterKind::classify(Some("STDOUT")).is_err());
    }

    #[test]
    fn select_degrades_unknown_to_disabled() {
        assert_eq!(ExporterKind::select(Some("bogus")), ExporterKind::Disabled);
        assert_eq!(ExporterKind::select(None), ExporterKind::Disabled);
        assert_eq!(ExporterKind::select(Some("otlp")), ExporterKind::Otlp);
    }

    #[test]
    fn only_live_backends_are_enabled() {
        assert!(ExporterKind::Stdout.is_enabled());
        assert!(ExporterKind::Otlp.is_enabled());
        assert!(!ExporterKind::Disabled.is_enabled());
        assert_eq!(ExporterKind::default(), ExporterKind::Disabled);
    }

    #[test]
    fn try_build_returns_both_exporters() {
        let pair = ExporterPair::try_build(
            ("trace", || Ok::<_, io::Error>(1u8)),
            ("metric", || Ok::<_, io::Error>("m")),
        )
        .unwrap();

        assert_eq!(pair.trace, 1);
        assert_eq!(pair.metric, "m");
    }

    #[test]
    fn try_build_wraps_trace_failure_without_building_metric() {
        let metric_built = Arc::new(AtomicBool::new(false));
        let flag = metric_built.clone();

        let result = ExporterPair::<u8, u8>::try_build(
            ("otlptracegrpc", || Err(io::Error::other("no channel"))),
            ("otlpmetricgrpc", move || {
                flag.store(true, Ordering::SeqCst);
                Ok::<_, io::Error>(0)
            }),
        );

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "otlptracegrpc: no channel");
        assert!(!metric_built.load(Ordering::SeqCst));
    }

    #[test]
    fn try_build_drops_trace_exporter_when_metric_fails() {
        let dropped = Arc::new(AtomicBool::new(false));
        let witness = DropWitness(dropped.clone());

        let result = ExporterPair::<DropWitness, u8>::try_build(
            ("stdouttrace", move || Ok::<_, io::Error>(witness)),
            ("stdoutmetric", || Err(io::Error::other("broken pipe"))),
        );

        match result {
            Err(TelemetryError::Exporter { exporter, .. }) => assert_eq!(exporter, "stdoutmetric"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[test]
    fn stdout_exporters_build() {
        assert!(StdoutExporters::stdout().is_ok());
    }

    #[tokio::test]
    async fn otlp_exporters_build_without_collector() {
        // Connection is lazy, so construction succeeds with nothing listening.
        assert!(OtlpExporters::otlp().is_ok());
    }
}
