//! Display cycle state machine
//!
//! Matchups are shown in order, followed by the summary screen, then the
//! cycle wraps. Wrapping from the summary back to the first matchup is the
//! only transition that asks for a refresh check.

use crate::config::TimingConfig;
use std::fmt;
use std::time::Duration;

/// What the panel is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    ShowingMatchup(usize),
    ShowingSummary,
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::ShowingMatchup(i) => write!(f, "SHOWING_MATCHUP({i})"),
            DisplayState::ShowingSummary => write!(f, "SHOWING_SUMMARY"),
        }
    }
}

/// Result of a dwell expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DisplayState,
    pub to: DisplayState,

    /// The cycle completed; the caller should refetch if the cache is stale
    pub refresh_check: bool,
}

#[derive(Debug)]
pub struct CycleMachine {
    state: DisplayState,
}

impl Default for CycleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleMachine {
    pub fn new() -> Self {
        Self { state: DisplayState::ShowingMatchup(0) }
    }

    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// How long the current state is held
    pub fn dwell(&self, timing: &TimingConfig) -> Duration {
        match self.state {
            DisplayState::ShowingMatchup(_) => timing.display_time(),
            DisplayState::ShowingSummary => timing.summary_display_time(),
        }
    }

    /// Restart at the first matchup if the current index no longer exists
    pub fn normalize(&mut self, matchup_count: usize) {
        if let DisplayState::ShowingMatchup(i) = self.state {
            if i >= matchup_count {
                self.state = DisplayState::ShowingMatchup(0);
            }
        }
    }

    /// Advance on dwell expiry. With no matchups the machine idles and
    /// returns `None` without moving.
    pub fn advance(&mut self, matchup_count: usize) -> Option<Transition> {
        if matchup_count == 0 {
            return None;
        }

        let from = self.state;
        let (to, refresh_check) = match from {
            DisplayState::ShowingMatchup(i) if i + 1 < matchup_count => {
                (DisplayState::ShowingMatchup(i + 1), false)
            }
            DisplayState::ShowingMatchup(_) => (DisplayState::ShowingSummary, false),
            DisplayState::ShowingSummary => (DisplayState::ShowingMatchup(0), true),
        };

        self.state = to;
        Some(Transition { from, to, refresh_check })
    }
}
