//! Snapshot sources
//!
//! The display pulls its data through [`SnapshotSource`] so the cycle can be
//! exercised without a live league API.

use crate::error::{DisplayError, DisplayResult};
use async_trait::async_trait;
use matchup_model::WeekSnapshot;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can produce a fresh week snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self) -> DisplayResult<WeekSnapshot>;
}

/// Fetches snapshots from the league API over HTTP
pub struct ApiClient {
    url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client with a bounded request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> DisplayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { url: url.into(), client })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Decode a response body into a snapshot
pub fn parse_snapshot(body: &[u8]) -> DisplayResult<WeekSnapshot> {
    let snapshot: WeekSnapshot =
        serde_json::from_slice(body).map_err(|e| DisplayError::Parse(e.to_string()))?;

    if snapshot.total_matchups != snapshot.matchups.len() {
        warn!(
            "Snapshot reports {} matchups but carries {}",
            snapshot.total_matchups,
            snapshot.matchups.len()
        );
    }
    Ok(snapshot)
}

#[async_trait]
impl SnapshotSource for ApiClient {
    async fn fetch_snapshot(&self) -> DisplayResult<WeekSnapshot> {
        debug!("Fetching data from: {}", self.url);

        // Every path below drops `response`, releasing the connection
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DisplayError::BadStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        parse_snapshot(&body)
    }
}
