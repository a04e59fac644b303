use anyhow::Result;
use clap::Parser;
use pathwise_application::AppServices;
use pathwise_execution::{DEFAULT_EVENT_CAPACITY, init_with_event_log};
use pathwise_infrastructure::ConfigService;
use pathwise_server::{AppState, serve};
use std::path::PathBuf;

/// Pathwise HTTP server
#[derive(Parser, Debug)]
#[command(name = "pathwise-server", version, about)]
struct Args {
    /// Path to config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigService::new(args.config).load()?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let events = init_with_event_log(&config.logging, DEFAULT_EVENT_CAPACITY)?;
    tracing::info!("Starting Pathwise server");

    let services = AppServices::from_config(&config)?;
    serve(&config.server, AppState::new(services, events)).await
}
