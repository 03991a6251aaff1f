//! Matchup Model - shared data model for the fantasy matrix system
//!
//! This crate defines the week snapshot served by the league API and consumed
//! by the matrix display, together with the win-probability heuristic and the
//! median helper both sides rely on.

pub mod probability;
pub mod stats;
pub mod types;

pub use probability::{estimate_win_probability, round_to, WinProbability};
pub use stats::median;
pub use types::{MatchupData, TeamSnapshot, WeekSnapshot, MAX_ABBREV_LEN};
