//! Configuration for the Matrix Display
//!
//! Defaults match a 64x32 panel polling a league API on the local network.
//! A TOML file may override any section; the API address and Wi-Fi
//! credentials may also come from the environment. Timing is fixed once the
//! client starts.

use crate::error::{DisplayError, DisplayResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for the Matrix Display
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// League API endpoint
    pub api: ApiConfig,

    /// Dwell and polling timing
    pub timing: TimingConfig,

    /// Panel geometry
    pub panel: PanelConfig,

    /// Color palette
    pub colors: ColorPalette,

    /// Wireless network credentials
    pub wifi: WifiConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// League API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
}

/// Dwell and polling timing, all in whole seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long each matchup stays on screen
    pub display_time_secs: u64,

    /// How long the summary screen stays on screen
    pub summary_display_time_secs: u64,

    /// Minimum age of the cached snapshot before a refetch
    pub refresh_interval_secs: u64,

    /// Upper bound on a single fetch
    pub fetch_timeout_secs: u64,

    /// Pause after an empty cache or a failed iteration
    pub retry_delay_secs: u64,
}

/// Panel geometry in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: u32,
    pub height: u32,

    /// Advance width of one glyph of the panel font
    pub glyph_width: u32,

    /// Baseline of the team code row
    pub team_row: u32,

    /// Baseline of the score row
    pub score_row: u32,

    /// Baseline of the third text row (summary only)
    pub footer_row: u32,

    /// Top edge of the probability bar
    pub bar_y: u32,

    pub bar_height: u32,
}

/// A 24-bit RGB color, written as an integer (e.g. `0x0000FF`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0x000000);
    pub const RED: Color = Color(0xFF0000);
    pub const GREEN: Color = Color(0x00FF00);
    pub const BLUE: Color = Color(0x0000FF);

    /// Split into red, green and blue channels
    pub fn rgb(self) -> (u8, u8, u8) {
        (((self.0 >> 16) & 0xFF) as u8, ((self.0 >> 8) & 0xFF) as u8, (self.0 & 0xFF) as u8)
    }
}

/// Colors used by the layouts. Single-channel colors render most reliably on
/// low bit-depth panels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub home_team: Color,
    pub away_team: Color,
    pub winning_score: Color,
    pub losing_score: Color,
    pub bar_home: Color,
    pub bar_away: Color,
    pub summary_title: Color,
    pub summary_label: Color,
    pub summary_value: Color,
}

/// Wireless network credentials; both are required to start
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub ssid: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for WifiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WifiConfig")
            .field("ssid", &self.ssid)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { host: "192.168.1.100".to_string(), port: 8000, path: "/league/data".to_string() }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            display_time_secs: 5,
            summary_display_time_secs: 10,
            refresh_interval_secs: 30,
            fetch_timeout_secs: 10,
            retry_delay_secs: 5,
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: 64,
            height: 32,
            glyph_width: 6,
            team_row: 6,
            score_row: 16,
            footer_row: 26,
            bar_y: 24,
            bar_height: 4,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            home_team: Color::BLUE,
            away_team: Color::RED,
            winning_score: Color::GREEN,
            losing_score: Color::RED,
            bar_home: Color::BLUE,
            bar_away: Color::BLACK,
            summary_title: Color::BLUE,
            summary_label: Color::RED,
            summary_value: Color::GREEN,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

impl TimingConfig {
    pub fn display_time(&self) -> Duration {
        Duration::from_secs(self.display_time_secs)
    }

    pub fn summary_display_time(&self) -> Duration {
        Duration::from_secs(self.summary_display_time_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl DisplayConfig {
    /// Full URL of the league data endpoint
    pub fn api_url(&self) -> String {
        let path = self.api.path.trim_start_matches('/');
        format!("http://{}:{}/{}", self.api.host, self.api.port, path)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> DisplayResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> DisplayResult<Self> {
        toml::from_str(content).map_err(|e| DisplayError::Config(format!("Invalid config file: {e}")))
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> DisplayResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DisplayError::Config(format!("Failed to encode config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) -> DisplayResult<()> {
        self.apply_lookup(|key| std::env::var(key).ok())
    }

    pub fn apply_lookup<F>(&mut self, lookup: F) -> DisplayResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = non_empty(lookup("API_HOST")) {
            self.api.host = host;
        }
        if let Some(port) = non_empty(lookup("API_PORT")) {
            self.api.port = port
                .parse()
                .map_err(|e| DisplayError::Config(format!("API_PORT must be a port number: {e}")))?;
        }
        if let Some(ssid) = non_empty(lookup("WIFI_SSID")) {
            self.wifi.ssid = Some(ssid);
        }
        if let Some(password) = non_empty(lookup("WIFI_PASSWORD")) {
            self.wifi.password = Some(password);
        }
        if let Some(level) = non_empty(lookup("MATRIX_LOG_LEVEL")) {
            self.logging.level = level;
        }
        if let Some(format) = non_empty(lookup("MATRIX_LOG_FORMAT")) {
            self.logging.format = format;
        }
        Ok(())
    }

    /// Wi-Fi credentials, or an error naming what is missing
    pub fn wifi_credentials(&self) -> DisplayResult<(&str, &str)> {
        let ssid = self.wifi.ssid.as_deref().filter(|s| !s.trim().is_empty());
        let password = self.wifi.password.as_deref().filter(|p| !p.is_empty());
        match (ssid, password) {
            (Some(ssid), Some(password)) => Ok((ssid, password)),
            (None, _) => Err(DisplayError::Config("WIFI_SSID is not set".to_string())),
            (_, None) => Err(DisplayError::Config("WIFI_PASSWORD is not set".to_string())),
        }
    }

    /// Validate configuration before starting
    pub fn validate(&self) -> DisplayResult<()> {
        self.wifi_credentials()?;

        if self.api.host.trim().is_empty() {
            return Err(DisplayError::Config("API host is empty".to_string()));
        }

        let timing = &self.timing;
        let intervals = [
            ("display_time_secs", timing.display_time_secs),
            ("summary_display_time_secs", timing.summary_display_time_secs),
            ("refresh_interval_secs", timing.refresh_interval_secs),
            ("fetch_timeout_secs", timing.fetch_timeout_secs),
            ("retry_delay_secs", timing.retry_delay_secs),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(DisplayError::Config(format!("{name} must be positive")));
            }
        }

        let panel = &self.panel;
        if panel.width == 0 || panel.height == 0 || panel.glyph_width == 0 {
            return Err(DisplayError::Config("Panel dimensions must be positive".to_string()));
        }
        if panel.bar_y + panel.bar_height > panel.height {
            return Err(DisplayError::Config("Probability bar does not fit the panel".to_string()));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(DisplayError::Config(format!("Invalid log level: {other}"))),
        }

        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn with_wifi() -> DisplayConfig {
        let mut config = DisplayConfig::default();
        config.wifi = WifiConfig { ssid: Some("HomeNet".to_string()), password: Some("hunter22".to_string()) };
        config
    }

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.api_url(), "http://192.168.1.100:8000/league/data");
        assert_eq!(config.timing.display_time(), Duration::from_secs(5));
        assert_eq!(config.timing.refresh_interval(), Duration::from_secs(30));
        assert_eq!(config.panel.width, 64);
        assert_eq!(config.colors.bar_away, Color::BLACK);
    }

    #[test]
    fn test_missing_wifi_is_fatal() {
        let config = DisplayConfig::default();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WIFI_SSID"));

        let mut config = DisplayConfig::default();
        config.wifi.ssid = Some("HomeNet".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("WIFI_PASSWORD"));
    }

    #[test]
    fn test_valid_with_wifi() {
        assert!(with_wifi().validate().is_ok());
    }

    #[test]
    fn test_zero_timing_rejected() {
        let mut config = with_wifi();
        config.timing.summary_display_time_secs = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("summary_display_time_secs"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DisplayConfig::default();
        config
            .apply_lookup(lookup(&[
                ("API_HOST", "10.0.0.5"),
                ("API_PORT", "9000"),
                ("WIFI_SSID", "Stadium"),
                ("WIFI_PASSWORD", "touchdown"),
            ]))
            .unwrap();

        assert_eq!(config.api_url(), "http://10.0.0.5:9000/league/data");
        assert_eq!(config.wifi_credentials().unwrap(), ("Stadium", "touchdown"));
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = DisplayConfig::default();
        assert!(config.apply_lookup(lookup(&[("API_PORT", "eighty")])).is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DisplayConfig::from_toml(
            r#"
            [timing]
            display_time_secs = 8

            [colors]
            away_team = 0x00FF00
            "#,
        )
        .unwrap();

        assert_eq!(config.timing.display_time_secs, 8);
        assert_eq!(config.timing.summary_display_time_secs, 10);
        assert_eq!(config.colors.away_team, Color::GREEN);
        assert_eq!(config.colors.home_team, Color::BLUE);
        assert_eq!(config.api.port, 8000);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.toml");

        let mut config = with_wifi();
        config.timing.refresh_interval_secs = 120;
        config.save_to_file(&path).unwrap();

        let loaded = DisplayConfig::from_file(&path).unwrap();
        assert_eq!(loaded.timing.refresh_interval_secs, 120);
        assert_eq!(loaded.wifi.ssid.as_deref(), Some("HomeNet"));
    }

    #[test]
    fn test_color_channels() {
        assert_eq!(Color(0x12AB34).rgb(), (0x12, 0xAB, 0x34));
        assert_eq!(Color::BLUE.rgb(), (0, 0, 255));
    }

    #[test]
    fn test_password_redacted_in_debug() {
        let rendered = format!("{:?}", with_wifi().wifi);
        assert!(!rendered.contains("hunter22"));
    }
}
