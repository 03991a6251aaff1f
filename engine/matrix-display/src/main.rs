//! Matrix Display client
//!
//! Joins the network, performs the first fetch and then cycles the panel
//! until interrupted. Without `--config` the built-in defaults are used;
//! the environment (and `.env`) may override the API address and Wi-Fi
//! credentials either way.

use anyhow::{Context, Result};
use clap::Parser;
use matrix_display::logging::initialize_logging;
use matrix_display::{ApiClient, DisplayConfig, HostNetwork, MatrixDisplay, NetworkLink, TerminalRenderer};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "matrix-display")]
#[command(about = "Cycle fantasy matchups on an LED matrix panel")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show every screen once, then exit
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenv::dotenv().ok();

    let mut config = match &cli.config {
        Some(path) => DisplayConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DisplayConfig::default(),
    };
    config.apply_env().context("Invalid environment override")?;

    initialize_logging(&config.logging)?;
    info!("Starting Matrix Display v{}", matrix_display::VERSION);

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return Err(e).context("Configuration check failed");
    }

    let (ssid, password) = config.wifi_credentials()?;
    let mut network = HostNetwork::new();
    network.connect(ssid, password).context("Failed to join network")?;

    let url = config.api_url();
    info!("Polling {} every {}s", url, config.timing.refresh_interval_secs);
    let source = ApiClient::new(url, config.timing.fetch_timeout())
        .context("Failed to create API client")?;
    let renderer = TerminalRenderer::stdout(&config.panel);

    let mut display = MatrixDisplay::new(config, source, renderer);
    display.start().await.context("Initial data fetch failed")?;

    if cli.once {
        display.run_cycle().await.context("Display cycle failed")?;
        return Ok(());
    }

    tokio::select! {
        _ = display.run() => {}
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    info!("Matrix Display stopped");
    Ok(())
}
