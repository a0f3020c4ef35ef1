//! EcoPulse daemon - Environmental analytics engine
//!
//! `ecopulsed` provides:
//! - Subscription to a sensor event stream
//! - Enrichment into a bounded in-memory history
//! - REST queries, what-if simulation and derived views

use anyhow::Context;
use clap::Parser;
use ecopulse_service::{EngineConfig, Server};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// EcoPulse daemon CLI
#[derive(Parser)]
#[command(name = "ecopulsed")]
#[command(about = "EcoPulse - Environmental sensor analytics engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ECOPULSE_CONFIG")]
    config: Option<String>,

    /// Listen address (overrides the configuration file)
    #[arg(short, long, env = "ECOPULSE_LISTEN_ADDR")]
    listen: Option<SocketAddr>,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "ECOPULSE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "ECOPULSE_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = EngineConfig::load(cli.config.as_deref()).with_context(|| {
        format!(
            "failed to load configuration from {}",
            cli.config.as_deref().unwrap_or("defaults")
        )
    })?;

    // Override with CLI args
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        capacity = config.history.capacity,
        "starting ecopulsed"
    );

    // Create and run server
    Server::new(config)
        .run()
        .await
        .context("ecopulsed terminated with an error")
}
