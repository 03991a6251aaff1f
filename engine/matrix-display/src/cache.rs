//! In-memory snapshot cache
//!
//! Holds the last successfully fetched week. A new snapshot replaces the old
//! one wholesale; failures never touch it.

use chrono::{DateTime, Utc};
use matchup_model::{MatchupData, WeekSnapshot};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct DisplayCache {
    snapshot: Option<WeekSnapshot>,
    last_fetch: Option<Instant>,
    fetched_at: Option<DateTime<Utc>>,
}

impl DisplayCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly fetched snapshot
    pub fn replace(&mut self, snapshot: WeekSnapshot, now: Instant) {
        self.snapshot = Some(snapshot);
        self.last_fetch = Some(now);
        self.fetched_at = Some(Utc::now());
    }

    pub fn snapshot(&self) -> Option<&WeekSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn matchup(&self, index: usize) -> Option<&MatchupData> {
        self.snapshot.as_ref().and_then(|s| s.matchups.get(index))
    }

    /// Number of matchups available to cycle through (zero when empty)
    pub fn matchup_count(&self) -> usize {
        self.snapshot.as_ref().map_or(0, |s| s.matchups.len())
    }

    /// Wall-clock time of the last successful fetch
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// True once at least `interval` has passed since the last successful fetch
    pub fn is_refresh_due(&self, now: Instant, interval: Duration) -> bool {
        match self.last_fetch {
            Some(last) => now.saturating_duration_since(last) >= interval,
            None => true,
        }
    }
}
