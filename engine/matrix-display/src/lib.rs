//! Matrix Display - fantasy matchups on an LED panel
//!
//! Polls the league API for the current week, keeps the latest snapshot in
//! memory and cycles through every matchup followed by a league summary on
//! fixed dwell timers. Fetches happen between cycles, so a slow or failed
//! request never stalls the panel.

pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod network;
pub mod render;
pub mod runner;
pub mod source;
pub mod state;

pub use cache::DisplayCache;
pub use config::DisplayConfig;
pub use error::{DisplayError, DisplayResult};
pub use layout::{Frame, MatchupFrame, SummaryFrame};
pub use network::{HostNetwork, NetworkLink};
pub use render::{Renderer, TerminalRenderer};
pub use runner::{MatrixDisplay, TickOutcome};
pub use source::{ApiClient, SnapshotSource};
pub use state::{CycleMachine, DisplayState, Transition};

/// Version of the Matrix Display
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
