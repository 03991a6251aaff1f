//! League API - fantasy matchups for the matrix display
//!
//! This crate pulls the current week's box scores from the ESPN fantasy
//! football API, derives a win probability for every matchup, and serves the
//! result as a single JSON snapshot over HTTP. Each request is served fresh;
//! nothing is cached between calls.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod espn;
pub mod logging;
pub mod provider;
pub mod rest_api;

pub use aggregator::LeagueService;
pub use config::LeagueApiConfig;
pub use error::{ApiError, ApiResult};
pub use espn::EspnClient;
pub use provider::{BoxScore, LeagueProvider, LeagueWeek, TeamLine};

/// Version of the League API
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8000;

/// Default upstream request timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;
