//! Network link management
//!
//! On the panel hardware the client joins a wireless network before its
//! first fetch. Hosts that are already online use [`HostNetwork`].

use crate::error::{DisplayError, DisplayResult};
use tracing::info;

pub trait NetworkLink {
    /// Join the given network; failure is fatal at startup
    fn connect(&mut self, ssid: &str, passphrase: &str) -> DisplayResult<()>;
}

/// Network link for hosts that manage their own connectivity
#[derive(Debug, Default)]
pub struct HostNetwork {
    ssid: Option<String>,
}

impl HostNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// SSID of the last successful connect
    pub fn ssid(&self) -> Option<&str> {
        self.ssid.as_deref()
    }
}

impl NetworkLink for HostNetwork {
    fn connect(&mut self, ssid: &str, passphrase: &str) -> DisplayResult<()> {
        if ssid.trim().is_empty() || passphrase.is_empty() {
            return Err(DisplayError::Network("SSID and passphrase are required".to_string()));
        }

        info!("Connecting to WiFi: {}", ssid);
        self.ssid = Some(ssid.to_string());
        info!("Connected to WiFi (host-managed link)");
        Ok(())
    }
}
