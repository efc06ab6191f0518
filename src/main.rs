use std::process::ExitCode;

use api_telemetry::cli::{Args, VERSION_EXIT_CODE};
use api_telemetry::telemetry::{self, logging, BuildInfo, TelemetryConfig};
use clap::Parser;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if args.version {
        match serde_json::to_string_pretty(&BuildInfo::current()) {
            Ok(info) => println!("{info}"),
            Err(_) => println!("{}", BuildInfo::current()),
        }
        return ExitCode::from(VERSION_EXIT_CODE);
    }

    let config = TelemetryConfig::from_env();
    if let Err(err) = logging::init_subscriber(&config) {
        eprintln!("cannot install log subscriber: {err}");
    }

    let telemetry = match telemetry::init_with_config(&config) {
        Ok(telemetry) => telemetry,
        Err(err) => {
            error!(error = %err, "cannot initialize telemetry");
            return ExitCode::FAILURE;
        }
    };

    // Listeners consume the global providers; they are not started here yet.
    info!(
        http = %args.http,
        grpc = %args.grpc,
        probe = %args.probe,
        exporter = %telemetry.exporter(),
        "service configured"
    );

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for shutdown signal");
    }

    let report = telemetry.halt().await;
    if !report.is_clean() {
        warn!("telemetry halted with errors");
    }
    ExitCode::SUCCESS
}
