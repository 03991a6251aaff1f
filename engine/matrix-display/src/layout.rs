//! Frame layout
//!
//! Pure functions turning a matchup or week snapshot into an immutable frame
//! description. Nothing here touches a display; renderers consume the result.

use crate::config::{Color, DisplayConfig, PanelConfig};
use matchup_model::{MatchupData, WeekSnapshot};

/// Horizontal anchoring of a label relative to its `x`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A line of text at a pixel position; `y` is the text baseline
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub color: Color,
    pub align: Align,
}

/// A filled rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchupFrame {
    pub home_code: Label,
    pub away_code: Label,
    pub home_score: Label,
    pub away_score: Label,

    /// Home segment first, then away
    pub bar: [Rect; 2],

    /// Pixel column where the home segment ends
    pub bar_split: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryFrame {
    pub title: Label,
    pub live_label: Label,
    pub live_value: Label,
    pub projected_label: Label,
    pub projected_value: Label,
}

/// Everything a renderer needs to draw one screen
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Matchup(MatchupFrame),
    Summary(SummaryFrame),
}

impl Frame {
    pub fn labels(&self) -> Vec<&Label> {
        match self {
            Frame::Matchup(m) => vec![&m.home_code, &m.away_code, &m.home_score, &m.away_score],
            Frame::Summary(s) => vec![
                &s.title,
                &s.live_label,
                &s.live_value,
                &s.projected_label,
                &s.projected_value,
            ],
        }
    }

    pub fn rects(&self) -> &[Rect] {
        match self {
            Frame::Matchup(m) => &m.bar,
            Frame::Summary(_) => &[],
        }
    }
}

fn left(text: impl Into<String>, x: u32, y: u32, color: Color) -> Label {
    Label { text: text.into(), x, y, color, align: Align::Left }
}

/// Right-aligned label whose `x` is where its first glyph starts
fn right(text: impl Into<String>, y: u32, color: Color, panel: &PanelConfig) -> Label {
    let text = text.into();
    let x = right_aligned_x(&text, panel);
    Label { text, x, y, color, align: Align::Right }
}

/// Left edge for text flush against the right side of the panel, never
/// negative
pub fn right_aligned_x(text: &str, panel: &PanelConfig) -> u32 {
    let text_width = (text.chars().count() as u32).saturating_mul(panel.glyph_width);
    panel.width.saturating_sub(text_width)
}

/// Pixels of bar given to the home segment
pub fn bar_split(home_probability: f64, bar_width: u32) -> u32 {
    let split = (home_probability.clamp(0.0, 1.0) * bar_width as f64).round();
    (split as u32).min(bar_width)
}

pub fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

/// Lay out one matchup screen
pub fn matchup_frame(matchup: &MatchupData, config: &DisplayConfig) -> MatchupFrame {
    let panel = &config.panel;
    let colors = &config.colors;
    let home = &matchup.home_team;
    let away = &matchup.away_team;

    // A tie marks both sides as not winning
    let (home_score_color, away_score_color) = if home.current_score > away.current_score {
        (colors.winning_score, colors.losing_score)
    } else if away.current_score > home.current_score {
        (colors.losing_score, colors.winning_score)
    } else {
        (colors.losing_score, colors.losing_score)
    };

    let split = bar_split(matchup.home_win_probability, panel.width);
    let bar = [
        Rect { x: 0, y: panel.bar_y, width: split, height: panel.bar_height, color: colors.bar_home },
        Rect {
            x: split,
            y: panel.bar_y,
            width: panel.width - split,
            height: panel.bar_height,
            color: colors.bar_away,
        },
    ];

    MatchupFrame {
        home_code: left(&home.team_abbrev, 0, panel.team_row, colors.home_team),
        away_code: right(&away.team_abbrev, panel.team_row, colors.away_team, panel),
        home_score: left(format_score(home.current_score), 0, panel.score_row, home_score_color),
        away_score: right(format_score(away.current_score), panel.score_row, away_score_color, panel),
        bar,
        bar_split: split,
    }
}

/// Lay out the league summary screen. The live median is recomputed from
/// the snapshot on every call.
pub fn summary_frame(snapshot: &WeekSnapshot, config: &DisplayConfig) -> SummaryFrame {
    let panel = &config.panel;
    let colors = &config.colors;

    let live = snapshot.live_median().map_or_else(|| "--".to_string(), format_score);
    let projected = snapshot.projected_median.map_or_else(|| "--".to_string(), format_score);

    SummaryFrame {
        title: left(format!("WEEK {}", snapshot.week), 0, panel.team_row, colors.summary_title),
        live_label: left("LIVE", 0, panel.score_row, colors.summary_label),
        live_value: right(live, panel.score_row, colors.summary_value, panel),
        projected_label: left("PROJ", 0, panel.footer_row, colors.summary_label),
        projected_value: right(projected, panel.footer_row, colors.summary_value, panel),
    }
}
