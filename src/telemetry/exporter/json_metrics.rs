use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use opentelemetry_proto::tonic::collector::metrics::v1::ExportMetricsServiceRequest;
use opentelemetry_sdk::error::{OTelSdkError, OTelSdkResult};
use opentelemetry_sdk::metrics::data::ResourceMetrics;
use opentelemetry_sdk::metrics::exporter::PushMetricExporter;
use opentelemetry_sdk::metrics::Temporality;

/// Push exporter writing each collection as one line of OTLP/JSON.
pub struct JsonMetricExporter {
    writer: Mutex<Box<dyn Write + Send>>,
    temporality: Temporality,
    is_shutdown: AtomicBool,
}

impl JsonMetricExporter {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W>(writer: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Mutex::new(Box::new(writer)),
            temporality: Temporality::Cumulative,
            is_shutdown: AtomicBool::new(false),
        }
    }

    pub fn with_temporality(mut self, temporality: Temporality) -> Self {
        self.temporality = temporality;
        self
    }

    fn write_line(&self, metrics: &ResourceMetrics) -> OTelSdkResult {
        let request = ExportMetricsServiceRequest::from(metrics);
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| OTelSdkError::InternalFailure("metric writer poisoned".to_string()))?;

        serde_json::to_writer(&mut *writer, &request)
            .map_err(|e| OTelSdkError::InternalFailure(format!("json encoding: {e}")))?;
        writeln!(writer).map_err(io_failure)?;
        writer.flush().map_err(io_failure)
    }

    fn flush(&self) -> OTelSdkResult {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| OTelSdkError::InternalFailure("metric writer poisoned".to_string()))?;
        writer.flush().map_err(io_failure)
    }
}

fn io_failure(err: io::Error) -> OTelSdkError {
    OTelSdkError::InternalFailure(err.to_string())
}

impl fmt::Debug for JsonMetricExporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonMetricExporter")
            .field("temporality", &self.temporality)
            .field("is_shutdown", &self.is_shutdown.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl PushMetricExporter for JsonMetricExporter {
    async fn export(&self, metrics: &ResourceMetrics) -> OTelSdkResult {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        self.write_line(metrics)
    }

    fn force_flush(&self) -> OTelSdkResult {
        self.flush()
    }

    fn shutdown_with_timeout(&self, _timeout: Duration) -> OTelSdkResult {
        if self.is_shutdown.swap(true, Ordering::SeqCst) {
            return Err(OTelSdkError::AlreadyShutdown);
        }
        self.flush()
    }

    fn temporality(&self) -> Temporality {
        self.temporality
    }
}
