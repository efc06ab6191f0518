use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider, SpanExporter};
use opentelemetry_sdk::Resource;
use tracing::info;

use crate::telemetry::build_info::BuildInfo;
use crate::telemetry::config::TelemetryConfig;
use crate::telemetry::error::TelemetryError;
use crate::telemetry::exporter::{ExporterKind, ExporterPair, OtlpExporters, StdoutExporters};
use crate::telemetry::registry;
use crate::telemetry::resource::ResourceDescriptor;
use crate::telemetry::shutdown::{Halt, HaltReport};

/// Initialized telemetry; owns the halt handle for the published providers.
#[derive(Debug)]
#[must_use = "dropping Telemetry skips the bounded shutdown"]
pub struct Telemetry {
    exporter: ExporterKind,
    halt: Halt,
}

impl Telemetry {
    pub fn exporter(&self) -> ExporterKind {
        self.exporter
    }

    pub fn is_enabled(&self) -> bool {
        !self.halt.is_noop()
    }

    /// Flush and close both providers. Consumes the handle.
    pub async fn halt(self) -> HaltReport {
        self.halt.halt().await
    }
}

/// Build tracer and meter providers around an exporter pair.
///
/// Every span is sampled; spans go through a batch processor and metrics
/// through a periodic reader. The resource is attached to the tracer
/// provider only.
pub fn build_providers<T, M>(
    exporters: ExporterPair<T, M>,
    resource: Resource,
) -> (SdkTracerProvider, SdkMeterProvider)
where
    T: SpanExporter + 'static,
    M: PushMetricExporter,
{
    let tracer = SdkTracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .with_batch_exporter(exporters.trace)
        .build();

    let meter = SdkMeterProvider::builder()
        .with_reader(PeriodicReader::builder(exporters.metric).build())
        .build();

    (tracer, meter)
}

/// Initialize telemetry with an already constructed exporter pair.
///
/// Nothing is published unless the resource builds and the process has not
/// been initialized before.
pub(crate) fn init_with_exporters<T, M>(
    kind: ExporterKind,
    exporters: ExporterPair<T, M>,
    config: &TelemetryConfig,
) -> Result<Telemetry, TelemetryError>
where
    T: SpanExporter + 'static,
    M: PushMetricExporter,
{
    let descriptor = ResourceDescriptor::new(config, &BuildInfo::current())?;
    registry::claim()?;

    let (tracer, meter) = build_providers(exporters, descriptor.to_resource());
    registry::publish_propagator();
    registry::publish_providers(tracer.clone(), meter.clone());

    info!(
        exporter = %kind,
        service.name = %config.service_name,
        service.version = %config.service_version,
        "telemetry initialized"
    );
    Ok(Telemetry {
        exporter: kind,
        halt: Halt::new(tracer, meter),
    })
}

fn init_disabled() -> Result<Telemetry, TelemetryError> {
    registry::claim()?;
    registry::publish_noop_providers();
    registry::publish_propagator();

    info!("telemetry disabled");
    Ok(Telemetry {
        exporter: ExporterKind::Disabled,
        halt: Halt::noop(),
    })
}

/// Initialize telemetry with config (exporter chosen from `config.exporter`)
///
/// Must be called from within a Tokio runtime when the OTLP backend may be
/// selected.
pub fn init_with_config(config: &TelemetryConfig) -> Result<Telemetry, TelemetryError> {
    match ExporterKind::select(config.exporter.as_deref()) {
        ExporterKind::Stdout => {
            init_with_exporters(ExporterKind::Stdout, StdoutExporters::stdout()?, config)
        }
        ExporterKind::Otlp => {
            init_with_exporters(ExporterKind::Otlp, OtlpExporters::otlp()?, config)
        }
        ExporterKind::Disabled => init_disabled(),
    }
}

/// Initialize telemetry from environment
pub fn init() -> Result<Telemetry, TelemetryError> {
    let config = TelemetryConfig::from_env();
    init_with_config(&config)
}
