//! Upstream league data provider abstraction

use crate::error::ApiResult;
use async_trait::async_trait;

/// One team's line in a box score
#[derive(Debug, Clone, PartialEq)]
pub struct TeamLine {
    pub team_id: u32,
    pub abbrev: String,
    pub name: String,
    pub score: f64,
    pub projected: f64,
}

/// Both sides of a single pairing for the current matchup period
#[derive(Debug, Clone, PartialEq)]
pub struct BoxScore {
    pub home: TeamLine,
    pub away: TeamLine,
    pub is_complete: bool,
}

/// The current week as reported by the provider, box scores in provider order
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueWeek {
    pub league_name: String,
    pub week: u32,
    pub box_scores: Vec<BoxScore>,
}

/// Source of league data for the current week.
///
/// Implementations issue a single upstream call per invocation and either
/// return the complete week or fail; they never return a partial list.
#[async_trait]
pub trait LeagueProvider: Send + Sync {
    async fn fetch_week(&self) -> ApiResult<LeagueWeek>;
}
