//! League API server
//!
//! Loads configuration from the environment (and `.env`), then serves the
//! current week's matchups until interrupted.

use anyhow::{Context, Result};
use league_api::config::LoggingConfig;
use league_api::logging::initialize_logging;
use league_api::{rest_api, EspnClient, LeagueApiConfig, LeagueService};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    initialize_logging(&LoggingConfig::from_env())?;
    info!("Starting League API v{}", league_api::VERSION);

    let config = match LeagueApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return Err(e).context("Failed to load configuration");
        }
    };
    info!(
        "Serving ESPN league {} season {} ({} league)",
        config.espn.league_id,
        config.espn.year,
        if config.espn.credentials.is_some() { "private" } else { "public" }
    );
    if let Some(week) = config.espn.week {
        info!("Serving pinned week {}", week);
    }

    let addr = config.server_addr()?;
    let client = EspnClient::new(config.espn.clone()).context("Failed to create ESPN client")?;
    let service = LeagueService::new(Arc::new(client));
    let routes = rest_api::create_routes(service);

    info!("Listening on http://{}", addr);
    let (_, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received");
        })
        .with_context(|| format!("Failed to bind {addr}"))?;
    server.await;

    info!("League API shutdown complete");
    Ok(())
}
