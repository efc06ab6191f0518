//! Process-wide telemetry state.
//!
//! OpenTelemetry keeps the tracer provider, meter provider and propagator in
//! `opentelemetry::global` so that any call site can reach them without
//! dependency injection. This module is the only place that writes them, and
//! it does so at most once per process: [`claim`] reserves the slot before
//! anything is published and every later attempt fails.

use std::sync::atomic::{AtomicBool, Ordering};

use opentelemetry::global;
use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::trace::noop::NoopTracerProvider;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};
use opentelemetry_sdk::trace::SdkTracerProvider;

use crate::telemetry::error::TelemetryError;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Whether telemetry was initialized in this process
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

/// Reserve the one-shot initialization slot.
pub(crate) fn claim() -> Result<(), TelemetryError> {
    INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .map(|_| ())
        .map_err(|_| TelemetryError::AlreadyInitialized)
}

/// W3C trace context plus baggage
pub fn composite_propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

pub(crate) fn publish_propagator() {
    global::set_text_map_propagator(composite_propagator());
}

pub(crate) fn publish_providers(tracer: SdkTracerProvider, meter: SdkMeterProvider) {
    global::set_tracer_provider(tracer);
    global::set_meter_provider(meter);
}

/// Replace whatever providers are installed with ones that record nothing.
///
/// The meter provider has no reader, so its instruments never export.
pub(crate) fn publish_noop_providers() {
    global::set_tracer_provider(NoopTracerProvider::new());
    global::set_meter_provider(SdkMeterProvider::builder().build());
}
