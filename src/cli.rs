use clap::Parser;

/// Exit status used after printing build information
pub const VERSION_EXIT_CODE: u8 = 2;

#[derive(Debug, Clone, Parser)]
#[command(name = "api", about = "API service", disable_version_flag = true)]
pub struct Args {
    /// HTTP service address to listen for incoming request on
    #[arg(long, default_value = "localhost:8080")]
    pub http: String,

    /// gRPC service address to listen for incoming request on
    #[arg(long, default_value = "localhost:8081")]
    pub grpc: String,

    /// Probe (inspected) HTTP service address
    #[arg(long, default_value = "localhost:7070")]
    pub probe: String,

    /// Print build info
    #[arg(long)]
    pub version: bool,
}
