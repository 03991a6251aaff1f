//! Configuration for the League API
//!
//! Everything is read from the process environment once at startup. A `.env`
//! file is loaded by the binary before this runs.

use crate::error::{ApiError, ApiResult};
use crate::{DEFAULT_PORT, DEFAULT_UPSTREAM_TIMEOUT_SECS};
use chrono::Datelike;
use std::net::SocketAddr;
use std::time::Duration;

/// ESPN fantasy API root
pub const DEFAULT_ESPN_BASE_URL: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

/// Main configuration for the League API
#[derive(Debug, Clone)]
pub struct LeagueApiConfig {
    /// Upstream league configuration
    pub espn: EspnConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Upstream league configuration
#[derive(Debug, Clone)]
pub struct EspnConfig {
    /// ESPN league ID
    pub league_id: u64,

    /// Season year
    pub year: i32,

    /// Scoring period to serve instead of the league's current one
    pub week: Option<u32>,

    /// Private-league session cookies
    pub credentials: Option<EspnCredentials>,

    /// API root, overridable for testing against a stub
    pub base_url: String,

    /// Upstream request timeout in seconds
    pub timeout_secs: u64,
}

/// Private-league session cookies, always supplied as a pair
#[derive(Clone)]
pub struct EspnCredentials {
    pub swid: String,
    pub espn_s2: String,
}

impl std::fmt::Debug for EspnCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EspnCredentials").field("swid", &"<redacted>").field("espn_s2", &"<redacted>").finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".to_string(), port: DEFAULT_PORT }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl EspnConfig {
    /// Upstream request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl LoggingConfig {
    /// Read logging settings from the environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(level) = non_empty(lookup("LEAGUE_API_LOG_LEVEL")) {
            config.level = level;
        }
        if let Some(format) = non_empty(lookup("LEAGUE_API_LOG_FORMAT")) {
            config.format = format;
        }
        config
    }
}

impl LeagueApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ApiResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let league_id = non_empty(lookup("ESPN_LEAGUE_ID"))
            .ok_or_else(|| ApiError::Config("ESPN_LEAGUE_ID is not set".to_string()))?
            .parse::<u64>()
            .map_err(|e| ApiError::Config(format!("ESPN_LEAGUE_ID must be an integer: {e}")))?;

        let year = match non_empty(lookup("ESPN_YEAR")) {
            Some(year) => year
                .parse::<i32>()
                .map_err(|e| ApiError::Config(format!("ESPN_YEAR must be an integer: {e}")))?,
            None => chrono::Utc::now().year(),
        };

        let week = match non_empty(lookup("ESPN_WEEK")) {
            Some(week) => Some(
                week.parse::<u32>()
                    .ok()
                    .filter(|w| *w > 0)
                    .ok_or_else(|| ApiError::Config(format!("ESPN_WEEK must be a positive integer, got {week}")))?,
            ),
            None => None,
        };

        let credentials = match (non_empty(lookup("ESPN_SWID")), non_empty(lookup("ESPN_S2"))) {
            (Some(swid), Some(espn_s2)) => Some(EspnCredentials { swid, espn_s2 }),
            (None, None) => None,
            _ => {
                return Err(ApiError::Config(
                    "ESPN_SWID and ESPN_S2 must be set together".to_string(),
                ))
            }
        };

        let mut server = ServerConfig::default();
        if let Some(host) = non_empty(lookup("LEAGUE_API_HOST")) {
            server.host = host;
        }
        if let Some(port) = non_empty(lookup("LEAGUE_API_PORT")) {
            server.port = port
                .parse()
                .map_err(|e| ApiError::Config(format!("LEAGUE_API_PORT must be a port number: {e}")))?;
        }

        let timeout_secs = match non_empty(lookup("LEAGUE_API_UPSTREAM_TIMEOUT_SECS")) {
            Some(secs) => secs.parse().map_err(|e| {
                ApiError::Config(format!("LEAGUE_API_UPSTREAM_TIMEOUT_SECS must be an integer: {e}"))
            })?,
            None => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let config = Self {
            espn: EspnConfig {
                league_id,
                year,
                week,
                credentials,
                base_url: non_empty(lookup("ESPN_BASE_URL"))
                    .unwrap_or_else(|| DEFAULT_ESPN_BASE_URL.to_string()),
                timeout_secs,
            },
            server,
            logging: LoggingConfig::from_lookup(&lookup),
        };
        config.validate()?;
        Ok(config)
    }

    /// Get the server address
    pub fn server_addr(&self) -> ApiResult<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ApiError::Config(format!("Invalid bind address: {e}")))
    }

    fn validate(&self) -> ApiResult<()> {
        if self.espn.timeout_secs == 0 {
            return Err(ApiError::Config("Upstream timeout must be positive".to_string()));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(ApiError::Config(format!("Invalid log level: {other}"))),
        }

        match self.logging.format.as_str() {
            "json" | "pretty" => {}
            other => return Err(ApiError::Config(format!("Invalid log format: {other}"))),
        }

        self.server_addr()?;
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
