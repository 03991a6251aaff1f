//! Week snapshot assembly
//!
//! Turns the provider's box scores into the wire snapshot the matrix display
//! consumes. Every request goes to the provider; nothing is cached.

use crate::error::ApiResult;
use crate::provider::{BoxScore, LeagueProvider, LeagueWeek, TeamLine};
use matchup_model::{MatchupData, TeamSnapshot, WeekSnapshot};
use std::sync::Arc;
use tracing::{error, info};

/// Serves week snapshots from an upstream provider
#[derive(Clone)]
pub struct LeagueService {
    provider: Arc<dyn LeagueProvider>,
}

impl LeagueService {
    pub fn new(provider: Arc<dyn LeagueProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the current week and build its snapshot; fails as a whole
    pub async fn league_data(&self) -> ApiResult<WeekSnapshot> {
        let week = self.provider.fetch_week().await.map_err(|e| {
            error!("Failed to fetch league data: {}", e);
            e
        })?;

        let snapshot = build_week_snapshot(week);
        info!(
            "Serving week {} with {} matchups (projected median {:?})",
            snapshot.week, snapshot.total_matchups, snapshot.projected_median
        );
        Ok(snapshot)
    }
}

/// Build the wire snapshot, preserving provider order
pub fn build_week_snapshot(week: LeagueWeek) -> WeekSnapshot {
    let matchups = week
        .box_scores
        .into_iter()
        .enumerate()
        .map(|(index, box_score)| matchup_from_box_score(index, box_score))
        .collect();

    WeekSnapshot::new(week.league_name, week.week, matchups)
}

fn matchup_from_box_score(index: usize, box_score: BoxScore) -> MatchupData {
    let BoxScore { home, away, is_complete } = box_score;
    MatchupData::new(index, team_snapshot(home), team_snapshot(away), is_complete)
}

fn team_snapshot(line: TeamLine) -> TeamSnapshot {
    TeamSnapshot::new(line.team_id, &line.abbrev, line.name, line.score, line.projected)
}
