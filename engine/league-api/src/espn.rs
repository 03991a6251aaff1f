//! ESPN fantasy football client
//!
//! Fetches the league, its teams, status and scoreboard in a single request
//! and reduces the response to the current matchup period's box scores.

use crate::config::EspnConfig;
use crate::error::{ApiError, ApiResult};
use crate::provider::{BoxScore, LeagueProvider, LeagueWeek, TeamLine};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, COOKIE};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Views requested from the league endpoint
const LEAGUE_VIEWS: [&str; 5] = ["mTeam", "mSettings", "mStatus", "mMatchupScore", "mScoreboard"];

/// Longest upstream error body kept in error messages
const MAX_ERROR_BODY: usize = 200;

/// Winner marker ESPN uses for matchups still in progress
const UNDECIDED: &str = "UNDECIDED";

/// ESPN league endpoint response, reduced to the fields we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnLeague {
    #[serde(default)]
    pub scoring_period_id: Option<u32>,

    #[serde(default)]
    pub settings: Option<EspnSettings>,

    #[serde(default)]
    pub status: Option<EspnStatus>,

    #[serde(default)]
    pub teams: Vec<EspnTeam>,

    #[serde(default)]
    pub schedule: Vec<EspnScheduleEntry>,
}

#[derive(Debug, Deserialize)]
pub struct EspnSettings {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnStatus {
    #[serde(default)]
    pub current_matchup_period: Option<u32>,

    #[serde(default)]
    pub latest_scoring_period: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct EspnTeam {
    pub id: u32,

    #[serde(default)]
    pub abbrev: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub nickname: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnScheduleEntry {
    pub matchup_period_id: u32,

    #[serde(default)]
    pub home: Option<EspnMatchupSide>,

    #[serde(default)]
    pub away: Option<EspnMatchupSide>,

    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EspnMatchupSide {
    pub team_id: u32,

    #[serde(default)]
    pub total_points: Option<f64>,

    #[serde(default)]
    pub total_points_live: Option<f64>,

    #[serde(default)]
    pub total_projected_points_live: Option<f64>,
}

impl EspnTeam {
    fn display_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }

        let parts: Vec<&str> = [self.location.as_deref(), self.nickname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            format!("Team {}", self.id)
        } else {
            parts.join(" ")
        }
    }

    fn display_abbrev(&self) -> String {
        self.abbrev.clone().unwrap_or_else(|| format!("T{}", self.id))
    }
}

impl EspnMatchupSide {
    fn current_score(&self) -> f64 {
        self.total_points_live.or(self.total_points).unwrap_or(0.0)
    }

    fn projected_score(&self) -> f64 {
        self.total_projected_points_live.unwrap_or_else(|| self.current_score())
    }

    fn has_projection(&self) -> bool {
        self.total_projected_points_live.is_some()
    }
}

impl EspnLeague {
    /// Reduce the raw response to one week's box scores. Without a pinned
    /// week the league's current scoring and matchup periods are used.
    pub fn into_league_week(self, pinned_week: Option<u32>) -> ApiResult<LeagueWeek> {
        let league_name = self
            .settings
            .map(|s| s.name)
            .ok_or_else(|| ApiError::Malformed("league settings missing".to_string()))?;

        let week = pinned_week
            .or(self.scoring_period_id)
            .or_else(|| self.status.as_ref().and_then(|s| s.latest_scoring_period))
            .filter(|w| *w > 0)
            .ok_or_else(|| ApiError::Malformed("current week missing".to_string()))?;

        let matchup_period = match pinned_week {
            Some(week) => week,
            None => self.status.as_ref().and_then(|s| s.current_matchup_period).unwrap_or(week),
        };

        let teams: HashMap<u32, EspnTeam> = self.teams.into_iter().map(|t| (t.id, t)).collect();

        let mut box_scores = Vec::new();
        let mut unprojected = 0;
        for entry in self.schedule.into_iter().filter(|e| e.matchup_period_id == matchup_period) {
            // Byes have no away side
            let (Some(home), Some(away)) = (entry.home, entry.away) else {
                continue;
            };

            unprojected += [&home, &away].iter().filter(|side| !side.has_projection()).count();
            let is_complete = entry.winner.as_deref().is_some_and(|w| w != UNDECIDED);
            box_scores.push(BoxScore {
                home: team_line(&teams, &home)?,
                away: team_line(&teams, &away)?,
                is_complete,
            });
        }

        if unprojected > 0 {
            warn!(
                "{} team(s) in week {} have no live projection; using current score",
                unprojected, week
            );
        }

        Ok(LeagueWeek { league_name, week, box_scores })
    }
}

fn team_line(teams: &HashMap<u32, EspnTeam>, side: &EspnMatchupSide) -> ApiResult<TeamLine> {
    let team = teams
        .get(&side.team_id)
        .ok_or_else(|| ApiError::Malformed(format!("unknown team id {}", side.team_id)))?;

    Ok(TeamLine {
        team_id: team.id,
        abbrev: team.display_abbrev(),
        name: team.display_name(),
        score: side.current_score(),
        projected: side.projected_score(),
    })
}

/// League data provider backed by the ESPN fantasy API
pub struct EspnClient {
    config: EspnConfig,
    client: Client,
}

impl EspnClient {
    /// Create a new client instance
    pub fn new(config: EspnConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { config, client })
    }

    /// League endpoint URL for the configured season
    pub fn league_url(&self) -> String {
        format!(
            "{}/seasons/{}/segments/0/leagues/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.year,
            self.config.league_id
        )
    }

    /// Views, plus the scoring period when a week is pinned
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> =
            LEAGUE_VIEWS.iter().map(|v| ("view", v.to_string())).collect();
        if let Some(week) = self.config.week {
            params.push(("scoringPeriodId", week.to_string()));
        }
        params
    }

    fn cookie_header(&self) -> ApiResult<Option<HeaderValue>> {
        match &self.config.credentials {
            Some(credentials) => {
                let cookie = format!("SWID={}; espn_s2={}", credentials.swid, credentials.espn_s2);
                HeaderValue::from_str(&cookie)
                    .map(Some)
                    .map_err(|e| ApiError::Config(format!("Invalid ESPN credentials: {e}")))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LeagueProvider for EspnClient {
    async fn fetch_week(&self) -> ApiResult<LeagueWeek> {
        let url = self.league_url();
        let params = self.query_params();

        info!("Fetching league {} season {}", self.config.league_id, self.config.year);
        debug!("League URL: {}", url);

        let mut request = self.client.get(&url).query(&params);
        if let Some(cookie) = self.cookie_header()? {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::UpstreamStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let league: EspnLeague = serde_json::from_str(&body)
            .map_err(|e| ApiError::Malformed(format!("league response did not parse: {e}")))?;
        let week = league.into_league_week(self.config.week)?;

        info!(
            "Fetched {} box scores for week {} of {}",
            week.box_scores.len(),
            week.week,
            week.league_name
        );
        Ok(week)
    }
}
