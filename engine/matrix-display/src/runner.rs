//! Display run loop
//!
//! Drives the cycle machine on fixed dwell timers, draws each frame and
//! refetches at most once per cycle. Fetch and render failures never stop
//! the loop once the first snapshot is in.

use crate::cache::DisplayCache;
use crate::config::DisplayConfig;
use crate::error::{DisplayError, DisplayResult};
use crate::layout::{matchup_frame, summary_frame, Frame};
use crate::render::Renderer;
use crate::source::SnapshotSource;
use crate::state::{CycleMachine, DisplayState, Transition};
use std::time::Instant;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// What a single loop iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing cached to show; waited the retry delay
    Idle,

    /// Drew a frame, held it, and moved on
    Advanced(Transition),

    /// The iteration failed and was absorbed after the retry delay
    Recovered,
}

pub struct MatrixDisplay<S: SnapshotSource, R: Renderer> {
    config: DisplayConfig,
    source: S,
    renderer: R,
    cache: DisplayCache,
    machine: CycleMachine,
}

impl<S: SnapshotSource, R: Renderer> MatrixDisplay<S, R> {
    pub fn new(config: DisplayConfig, source: S, renderer: R) -> Self {
        Self { config, source, renderer, cache: DisplayCache::new(), machine: CycleMachine::new() }
    }

    pub fn cache(&self) -> &DisplayCache {
        &self.cache
    }

    pub fn state(&self) -> DisplayState {
        self.machine.state()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    async fn fetch(&mut self) -> DisplayResult<()> {
        let snapshot = self.source.fetch_snapshot().await?;
        let (week, count) = (snapshot.week, snapshot.matchups.len());
        self.cache.replace(snapshot, Instant::now());
        if let Some(fetched_at) = self.cache.fetched_at() {
            info!(
                "Fetched week {} data with {} matchups at {}",
                week,
                count,
                fetched_at.format("%H:%M:%S")
            );
        }
        Ok(())
    }

    /// Initial blocking fetch; the loop must not start without data
    pub async fn start(&mut self) -> DisplayResult<()> {
        self.fetch().await.map_err(|e| {
            error!("Initial data fetch failed: {}", e);
            e
        })
    }

    /// Refetch, keeping the cached snapshot on failure. Returns whether the
    /// cache was replaced.
    pub async fn refresh(&mut self) -> bool {
        match self.fetch().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Error fetching data, keeping cached snapshot: {}", e);
                false
            }
        }
    }

    /// Refetch only if the cache is older than the refresh interval
    pub async fn refresh_if_due(&mut self, now: Instant) -> bool {
        if !self.cache.is_refresh_due(now, self.config.timing.refresh_interval()) {
            debug!("Cached snapshot is fresh, skipping refresh");
            return false;
        }
        self.refresh().await
    }

    /// Frame for the current state, if the cache can supply it
    pub fn current_frame(&self) -> Option<Frame> {
        match self.machine.state() {
            DisplayState::ShowingMatchup(index) => {
                let matchup = self.cache.matchup(index)?;
                debug!(
                    "Displaying matchup {}: {} vs {} ({:.0}%-{:.0}%)",
                    index + 1,
                    matchup.home_team.team_abbrev,
                    matchup.away_team.team_abbrev,
                    matchup.home_win_probability * 100.0,
                    matchup.away_win_probability * 100.0
                );
                Some(Frame::Matchup(matchup_frame(matchup, &self.config)))
            }
            DisplayState::ShowingSummary => {
                let snapshot = self.cache.snapshot()?;
                debug!("Displaying week {} summary", snapshot.week);
                Some(Frame::Summary(summary_frame(snapshot, &self.config)))
            }
        }
    }

    /// One loop iteration with errors surfaced to the caller
    pub async fn try_tick(&mut self) -> DisplayResult<TickOutcome> {
        let count = self.cache.matchup_count();
        if count == 0 {
            warn!("No matchup data available");
            sleep(self.config.timing.retry_delay()).await;
            // The summary wrap never happens while empty
            self.refresh_if_due(Instant::now()).await;
            return Ok(TickOutcome::Idle);
        }

        self.machine.normalize(count);
        let frame = self.current_frame().ok_or_else(|| {
            DisplayError::Render(format!("No frame for state {}", self.machine.state()))
        })?;
        self.renderer.render(&frame)?;

        sleep(self.machine.dwell(&self.config.timing)).await;

        let Some(transition) = self.machine.advance(count) else {
            return Ok(TickOutcome::Idle);
        };
        if transition.refresh_check {
            self.refresh_if_due(Instant::now()).await;
        }
        Ok(TickOutcome::Advanced(transition))
    }

    /// One loop iteration; failures are logged and followed by the retry delay
    pub async fn tick(&mut self) -> TickOutcome {
        match self.try_tick().await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error in main loop: {}", e);
                sleep(self.config.timing.retry_delay()).await;
                TickOutcome::Recovered
            }
        }
    }

    /// Show every screen once, ending after the summary
    pub async fn run_cycle(&mut self) -> DisplayResult<()> {
        loop {
            match self.try_tick().await? {
                TickOutcome::Idle => return Ok(()),
                TickOutcome::Advanced(transition) if transition.refresh_check => return Ok(()),
                _ => {}
            }
        }
    }

    pub async fn run(&mut self) {
        info!("Starting display loop at {}", self.machine.state());
        loop {
            self.tick().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimingConfig;
    use async_trait::async_trait;
    use matchup_model::{MatchupData, TeamSnapshot, WeekSnapshot};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedSource {
        responses: Mutex<VecDeque<DisplayResult<WeekSnapshot>>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(responses: Vec<DisplayResult<WeekSnapshot>>) -> Self {
            Self { responses: Mutex::new(responses.into()), calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SnapshotSource for ScriptedSource {
        async fn fetch_snapshot(&self) -> DisplayResult<WeekSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.lock().unwrap().pop_front().unwrap_or(Err(DisplayError::BadStatus(503)))
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        frames: Vec<Frame>,
        fail: bool,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, frame: &Frame) -> DisplayResult<()> {
            if self.fail {
                return Err(DisplayError::Render("panel offline".to_string()));
            }
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn week(n: u32, matchups: usize) -> WeekSnapshot {
        let list = (0..matchups)
            .map(|i| {
                MatchupData::new(
                    i,
                    TeamSnapshot::new(1, &format!("H{i}"), "Home", 50.0, 100.0),
                    TeamSnapshot::new(2, &format!("A{i}"), "Away", 40.0, 90.0),
                    false,
                )
            })
            .collect();
        WeekSnapshot::new("Runner League", n, list)
    }

    fn instant_config(refresh_interval_secs: u64) -> DisplayConfig {
        DisplayConfig {
            timing: TimingConfig {
                display_time_secs: 0,
                summary_display_time_secs: 0,
                refresh_interval_secs,
                fetch_timeout_secs: 1,
                retry_delay_secs: 0,
            },
            ..Default::default()
        }
    }

    fn display(
        refresh_interval_secs: u64,
        responses: Vec<DisplayResult<WeekSnapshot>>,
    ) -> MatrixDisplay<ScriptedSource, RecordingRenderer> {
        MatrixDisplay::new(
            instant_config(refresh_interval_secs),
            ScriptedSource::new(responses),
            RecordingRenderer::default(),
        )
    }

    fn home_code(frame: &Frame) -> Option<&str> {
        match frame {
            Frame::Matchup(m) => Some(m.home_code.text.as_str()),
            Frame::Summary(_) => None,
        }
    }

    #[tokio::test]
    async fn test_failed_initial_fetch_is_fatal() {
        let mut display = display(0, vec![Err(DisplayError::BadStatus(500))]);
        tokio_test::assert_err!(display.start().await);
        assert!(display.cache().snapshot().is_none());
    }

    #[tokio::test]
    async fn test_full_cycle_renders_and_refreshes() {
        let mut display = display(0, vec![Ok(week(1, 2)), Ok(week(2, 2))]);
        display.start().await.unwrap();

        let t1 = display.try_tick().await.unwrap();
        assert_eq!(t1, TickOutcome::Advanced(Transition {
            from: DisplayState::ShowingMatchup(0),
            to: DisplayState::ShowingMatchup(1),
            refresh_check: false,
        }));
        display.try_tick().await.unwrap();
        assert_eq!(display.state(), DisplayState::ShowingSummary);
        assert_eq!(display.source.calls(), 1);

        let t3 = display.try_tick().await.unwrap();
        assert!(matches!(t3, TickOutcome::Advanced(t) if t.refresh_check));
        assert_eq!(display.state(), DisplayState::ShowingMatchup(0));
        assert_eq!(display.source.calls(), 2);
        assert_eq!(display.cache().snapshot().unwrap().week, 2);

        let frames = &display.renderer().frames;
        assert_eq!(frames.len(), 3);
        assert_eq!(home_code(&frames[0]), Some("H0"));
        assert_eq!(home_code(&frames[1]), Some("H1"));
        assert!(matches!(frames[2], Frame::Summary(_)));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_stale_snapshot() {
        let mut display = display(0, vec![Ok(week(4, 1))]);
        display.start().await.unwrap();

        display.try_tick().await.unwrap();
        display.try_tick().await.unwrap();
        assert_eq!(display.source.calls(), 2);
        assert_eq!(display.cache().snapshot().unwrap().week, 4);

        // Rendering carries on with the cached data
        display.try_tick().await.unwrap();
        assert_eq!(display.renderer().frames.len(), 3);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_refresh() {
        let mut display = display(3600, vec![Ok(week(1, 1))]);
        display.start().await.unwrap();

        for _ in 0..6 {
            display.try_tick().await.unwrap();
        }
        assert_eq!(display.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_week_idles() {
        let mut display = display(0, vec![Ok(week(1, 0))]);
        display.start().await.unwrap();

        assert_eq!(display.try_tick().await.unwrap(), TickOutcome::Idle);
        assert_eq!(display.try_tick().await.unwrap(), TickOutcome::Idle);
        assert!(display.renderer().frames.is_empty());
        assert_eq!(display.state(), DisplayState::ShowingMatchup(0));
    }

    #[tokio::test]
    async fn test_empty_week_refetches_until_matchups_arrive() {
        let mut display = display(0, vec![Ok(week(1, 0)), Ok(week(2, 3))]);
        display.start().await.unwrap();

        assert_eq!(display.tick().await, TickOutcome::Idle);
        assert_eq!(display.source.calls(), 2);
        assert_eq!(display.cache().snapshot().unwrap().week, 2);

        assert!(matches!(display.tick().await, TickOutcome::Advanced(_)));
        assert_eq!(display.renderer().frames.len(), 1);
        assert_eq!(home_code(&display.renderer().frames[0]), Some("H0"));
    }

    #[tokio::test]
    async fn test_empty_week_respects_refresh_interval() {
        let mut display = display(3600, vec![Ok(week(1, 0))]);
        display.start().await.unwrap();

        for _ in 0..5 {
            assert_eq!(display.tick().await, TickOutcome::Idle);
        }
        assert_eq!(display.source.calls(), 1);
    }

    #[tokio::test]
    async fn test_render_failure_is_absorbed() {
        let mut display = MatrixDisplay::new(
            instant_config(0),
            ScriptedSource::new(vec![Ok(week(1, 2))]),
            RecordingRenderer { frames: Vec::new(), fail: true },
        );
        display.start().await.unwrap();

        assert_eq!(display.tick().await, TickOutcome::Recovered);
        assert_eq!(display.state(), DisplayState::ShowingMatchup(0));
    }

    #[tokio::test]
    async fn test_shrunk_snapshot_restarts_cycle() {
        let mut display = display(0, vec![Ok(week(1, 3)), Ok(week(1, 1))]);
        display.start().await.unwrap();

        display.try_tick().await.unwrap();
        display.try_tick().await.unwrap();
        assert_eq!(display.state(), DisplayState::ShowingMatchup(2));

        assert!(display.refresh().await);
        display.try_tick().await.unwrap();

        let last = display.renderer().frames.last().unwrap();
        assert_eq!(home_code(last), Some("H0"));
        assert_eq!(display.state(), DisplayState::ShowingSummary);
    }

    #[tokio::test]
    async fn test_run_cycle_shows_each_screen_once() {
        let mut display = display(3600, vec![Ok(week(3, 2))]);
        tokio_test::assert_ok!(display.start().await);
        tokio_test::assert_ok!(display.run_cycle().await);

        let frames = &display.renderer().frames;
        assert_eq!(frames.len(), 3);
        assert!(matches!(frames[2], Frame::Summary(_)));
        assert_eq!(display.state(), DisplayState::ShowingMatchup(0));
    }
}
