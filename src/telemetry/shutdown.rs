//! Time-bounded teardown of the tracer and meter providers.

use std::thread;
use std::time::Duration;

use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tokio::sync::oneshot;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error};

use crate::telemetry::error::ShutdownError;

/// Budget shared by both provider shutdowns
pub const HALT_BUDGET: Duration = Duration::from_secs(1);

/// A provider that can be drained and closed within a timeout.
///
/// `shutdown_within` blocks the calling thread.
pub trait ProviderShutdown: Send + 'static {
    /// Name used in logs and errors
    fn name(&self) -> &'static str;

    fn shutdown_within(&self, timeout: Duration) -> OTelSdkResult;
}

impl ProviderShutdown for SdkTracerProvider {
    fn name(&self) -> &'static str {
        "tracer"
    }

    fn shutdown_within(&self, timeout: Duration) -> OTelSdkResult {
        self.shutdown_with_timeout(timeout)
    }
}

impl ProviderShutdown for SdkMeterProvider {
    fn name(&self) -> &'static str {
        "meter"
    }

    fn shutdown_within(&self, timeout: Duration) -> OTelSdkResult {
        self.shutdown_with_timeout(timeout)
    }
}

/// Outcome of one halt, one entry per provider
#[derive(Debug)]
pub struct HaltReport {
    pub tracer: Result<(), ShutdownError>,
    pub meter: Result<(), ShutdownError>,
}

impl HaltReport {
    fn clean() -> Self {
        Self {
            tracer: Ok(()),
            meter: Ok(()),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.tracer.is_ok() && self.meter.is_ok()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ShutdownError> {
        [&self.tracer, &self.meter]
            .into_iter()
            .filter_map(|outcome| outcome.as_ref().err())
    }
}

/// Halt handle returned by initialization.
///
/// Halting consumes the handle, so the providers are shut down at most once.
#[derive(Debug)]
#[must_use = "telemetry is only flushed when the handle is halted"]
pub struct Halt {
    providers: Option<(SdkTracerProvider, SdkMeterProvider)>,
}

impl Halt {
    pub(crate) fn noop() -> Self {
        Self { providers: None }
    }

    pub(crate) fn new(tracer: SdkTracerProvider, meter: SdkMeterProvider) -> Self {
        Self {
            providers: Some((tracer, meter)),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.providers.is_none()
    }

    /// Shut both providers down concurrently within [`HALT_BUDGET`].
    pub async fn halt(self) -> HaltReport {
        match self.providers {
            Some((tracer, meter)) => shutdown_concurrently(tracer, meter, HALT_BUDGET).await,
            None => HaltReport::clean(),
        }
    }
}

/// Shut down two providers in parallel under one deadline.
///
/// Both shutdowns start before either is awaited. A failure of one never
/// cancels the other; each failure is logged on its own.
pub async fn shutdown_concurrently<T, M>(tracer: T, meter: M, budget: Duration) -> HaltReport
where
    T: ProviderShutdown,
    M: ProviderShutdown,
{
    let deadline = Instant::now() + budget;

    let (tracer, meter) = tokio::join!(
        shutdown_one(tracer, deadline, budget),
        shutdown_one(meter, deadline, budget),
    );

    let report = HaltReport { tracer, meter };
    for failure in report.failures() {
        error!(provider = failure.provider(), error = %failure, "telemetry provider shutdown failed");
    }
    report
}

async fn shutdown_one<P>(provider: P, deadline: Instant, budget: Duration) -> Result<(), ShutdownError>
where
    P: ProviderShutdown,
{
    let name = provider.name();
    let remaining = deadline.saturating_duration_since(Instant::now());
    let (done, outcome) = oneshot::channel();

    // Detached: a shutdown that overruns the deadline must not hold up the
    // runtime (or the process) once the halt has returned.
    thread::Builder::new()
        .name(format!("{name}-shutdown"))
        .spawn(move || {
            let _ = done.send(provider.shutdown_within(remaining));
        })
        .map_err(|source| ShutdownError::Spawn {
            provider: name,
            source,
        })?;

    match timeout_at(deadline, outcome).await {
        Ok(Ok(Ok(()))) => {
            debug!(provider = name, "telemetry provider shut down");
            Ok(())
        }
        Ok(Ok(Err(source))) => Err(ShutdownError::Provider {
            provider: name,
            source,
        }),
        Ok(Err(_closed)) => Err(ShutdownError::Panicked { provider: name }),
        Err(_elapsed) => Err(ShutdownError::DeadlineExceeded {
            provider: name,
            budget,
        }),
    }
}
