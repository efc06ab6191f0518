//! Telemetry bootstrap for the `api` service.

pub mod cli;
pub mod telemetry;
