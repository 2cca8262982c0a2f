//! Main entry point for the insights-exporter CLI

use clap::Parser;
use insights_exporter::cli::{Cli, Commands};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber with optional JSON formatting
///
/// Logs go to stderr so stdout carries only command output.
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("insights_exporter=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.into_command() {
        Commands::Export(ref args) => args.execute().await.map(|_| ()).map_err(anyhow::Error::from),
        Commands::Overview(ref args) => args.execute().map(|_| ()).map_err(anyhow::Error::from),
        Commands::Engagement(ref args) => args.execute().map_err(anyhow::Error::from),
        Commands::PostTypes(ref args) => args.execute().map(|_| ()).map_err(anyhow::Error::from),
        Commands::Hashtags(ref args) => args.execute().map(|_| ()).map_err(anyhow::Error::from),
    };

    if let Err(e) = result {
        error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
