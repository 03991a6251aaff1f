use crate::probability::{estimate_win_probability, round_to};
use crate::stats::median;
use serde::{Deserialize, Serialize};

/// Longest team code the matrix panel can show
pub const MAX_ABBREV_LEN: usize = 4;

/// One side of a matchup as served on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    /// Provider team ID
    pub team_id: u32,

    /// Short display code (at most 4 characters, e.g. "TACO")
    pub team_abbrev: String,

    /// Full team name
    pub team_name: String,

    /// Live score, one decimal
    pub current_score: f64,

    /// Projected final score, one decimal
    pub projected_score: f64,
}

impl TeamSnapshot {
    /// Create a team snapshot, trimming the code and rounding both scores
    pub fn new(
        team_id: u32,
        team_abbrev: &str,
        team_name: impl Into<String>,
        current_score: f64,
        projected_score: f64,
    ) -> Self {
        Self {
            team_id,
            team_abbrev: team_abbrev.trim().chars().take(MAX_ABBREV_LEN).collect(),
            team_name: team_name.into(),
            current_score: round_to(current_score, 1),
            projected_score: round_to(projected_score, 1),
        }
    }
}

/// A single head-to-head pairing for the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupData {
    /// Zero-based position in the week's matchup list
    pub matchup_index: usize,
    pub home_team: TeamSnapshot,
    pub away_team: TeamSnapshot,
    pub home_win_probability: f64,
    pub away_win_probability: f64,
    pub is_complete: bool,
}

impl MatchupData {
    /// Build a matchup; probabilities are always derived from the two teams
    pub fn new(
        matchup_index: usize,
        home_team: TeamSnapshot,
        away_team: TeamSnapshot,
        is_complete: bool,
    ) -> Self {
        let probability = estimate_win_probability(
            home_team.current_score,
            away_team.current_score,
            home_team.projected_score,
            away_team.projected_score,
        );

        Self {
            matchup_index,
            home_team,
            away_team,
            home_win_probability: probability.home,
            away_win_probability: probability.away,
            is_complete,
        }
    }

    /// Both teams, home first
    pub fn teams(&self) -> [&TeamSnapshot; 2] {
        [&self.home_team, &self.away_team]
    }
}

/// Everything the matrix needs for one week, served from `/league/data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSnapshot {
    pub matchups: Vec<MatchupData>,
    pub week: u32,
    pub league_name: String,
    pub total_matchups: usize,

    /// Median projected score across every team; absent from older servers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_median: Option<f64>,
}

impl WeekSnapshot {
    /// Assemble a snapshot, filling in the derived count and projected median
    pub fn new(league_name: impl Into<String>, week: u32, matchups: Vec<MatchupData>) -> Self {
        let projected: Vec<f64> = matchups
            .iter()
            .flat_map(|m| m.teams())
            .map(|team| team.projected_score)
            .collect();
        let projected_median = Some(median(&projected).unwrap_or(0.0));

        Self {
            total_matchups: matchups.len(),
            matchups,
            week,
            league_name: league_name.into(),
            projected_median,
        }
    }

    /// Current scores of every team, home then away per matchup
    pub fn current_scores(&self) -> Vec<f64> {
        self.matchups.iter().flat_map(|m| m.teams()).map(|team| team.current_score).collect()
    }

    /// Median of all live scores, computed on demand
    pub fn live_median(&self) -> Option<f64> {
        median(&self.current_scores())
    }

    pub fn is_empty(&self) -> bool {
        self.matchups.is_empty()
    }
}
