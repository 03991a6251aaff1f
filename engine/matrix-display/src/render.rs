//! Frame renderers
//!
//! The LED panel driver sits behind [`Renderer`]. [`TerminalRenderer`] draws
//! frames as colored text so the client can run on any host.

use crate::config::{Color, PanelConfig};
use crate::error::{DisplayError, DisplayResult};
use crate::layout::{Align, Frame};
use colored::Colorize;
use std::io::{self, Write};

/// Pixel rows covered by one terminal line
const ROW_PITCH: u32 = 8;

/// Pixel columns covered by one terminal cell
const COLUMN_PITCH: u32 = 2;

const BAR_GLYPH: char = '█';

/// Draws an immutable frame description
pub trait Renderer: Send {
    fn render(&mut self, frame: &Frame) -> DisplayResult<()>;
}

type Cell = Option<(char, Color)>;

/// Renders frames to a terminal (or any writer) with ANSI truecolor
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    columns: usize,
    rows: usize,
    width: u32,
    colorize: bool,
    clear_screen: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(panel: &PanelConfig) -> Self {
        let mut renderer = Self::with_writer(io::stdout(), panel);
        renderer.colorize = true;
        renderer.clear_screen = true;
        renderer
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Plain-text renderer over an arbitrary writer
    pub fn with_writer(out: W, panel: &PanelConfig) -> Self {
        Self {
            out,
            columns: (panel.width / COLUMN_PITCH).max(1) as usize,
            rows: panel.height.div_ceil(ROW_PITCH).max(1) as usize,
            width: panel.width.max(1),
            colorize: false,
            clear_screen: false,
        }
    }

    pub fn colorize(mut self, enabled: bool) -> Self {
        self.colorize = enabled;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn column(&self, x: u32) -> usize {
        (x as usize * self.columns) / self.width as usize
    }

    fn row(&self, y: u32) -> usize {
        ((y / ROW_PITCH) as usize).min(self.rows - 1)
    }

    fn rasterize(&self, frame: &Frame) -> Vec<Vec<Cell>> {
        let mut grid = vec![vec![None; self.columns]; self.rows];

        for rect in frame.rects() {
            let start = self.column(rect.x);
            let end = self.column(rect.x + rect.width).min(self.columns);
            let first_row = self.row(rect.y);
            let last_row = self.row((rect.y + rect.height).saturating_sub(1));
            for row in grid.iter_mut().take(last_row + 1).skip(first_row) {
                for cell in row.iter_mut().take(end).skip(start) {
                    *cell = Some((BAR_GLYPH, rect.color));
                }
            }
        }

        for label in frame.labels() {
            let len = label.text.chars().count();
            let start = match label.align {
                Align::Left => self.column(label.x),
                Align::Right => self.columns.saturating_sub(len),
            };
            let row = &mut grid[self.row(label.y)];
            for (offset, ch) in label.text.chars().enumerate() {
                if let Some(cell) = row.get_mut(start + offset) {
                    *cell = Some((ch, label.color));
                }
            }
        }

        grid
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colorize {
            let (r, g, b) = color.rgb();
            text.truecolor(r, g, b).to_string()
        } else {
            text.to_string()
        }
    }

    /// Join a row into runs of equally colored cells
    fn line(&self, row: &[Cell]) -> String {
        let mut line = String::new();
        let mut run = String::new();
        let mut run_color: Option<Color> = None;

        for cell in row {
            let (ch, color) = match cell {
                Some((ch, color)) => (*ch, Some(*color)),
                None => (' ', None),
            };
            if color != run_color && !run.is_empty() {
                line.push_str(&self.flush(&run, run_color));
                run.clear();
            }
            run_color = color;
            run.push(ch);
        }
        line.push_str(&self.flush(&run, run_color));
        line
    }

    fn flush(&self, run: &str, color: Option<Color>) -> String {
        match color {
            Some(color) => self.paint(run, color),
            None => run.to_string(),
        }
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&mut self, frame: &Frame) -> DisplayResult<()> {
        let grid = self.rasterize(frame);
        let border = format!("+{}+", "-".repeat(self.columns));

        let mut text = String::new();
        if self.clear_screen {
            text.push_str("\x1b[2J\x1b[H");
        }
        text.push_str(&border);
        text.push('\n');
        for row in &grid {
            text.push('|');
            text.push_str(&self.line(row));
            text.push_str("|\n");
        }
        text.push_str(&border);
        text.push('\n');

        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| DisplayError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::layout::{matchup_frame, summary_frame};
    use matchup_model::{MatchupData, TeamSnapshot, WeekSnapshot};

    fn sample_matchup() -> MatchupData {
        MatchupData::new(
            0,
            TeamSnapshot::new(1, "TACO", "Taco Corp", 50.0, 100.0),
            TeamSnapshot::new(2, "BEEF", "Beef Cake", 40.0, 90.0),
            false,
        )
    }

    fn render_to_string(frame: &Frame) -> String {
        let config = DisplayConfig::default();
        let mut renderer = TerminalRenderer::with_writer(Vec::new(), &config.panel);
        renderer.render(frame).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_matchup_render_layout() {
        let config = DisplayConfig::default();
        let frame = Frame::Matchup(matchup_frame(&sample_matchup(), &config));
        let output = render_to_string(&frame);
        let lines: Vec<&str> = output.lines().collect();

        // Border, 4 panel rows, border
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("|TACO"));
        assert!(lines[1].ends_with("BEEF|"));
        assert!(lines[3].starts_with("|50.0"));
        assert!(lines[3].ends_with("40.0|"));

        // Home and away segments together span the bar row
        let bar_cells = lines[4].chars().filter(|c| *c == BAR_GLYPH).count();
        assert_eq!(bar_cells, 32);
        assert_eq!(lines[4].chars().nth(1), Some(BAR_GLYPH));
    }

    #[test]
    fn test_summary_render() {
        let config = DisplayConfig::default();
        let snapshot = WeekSnapshot::new("Render League", 6, vec![sample_matchup()]);
        let frame = Frame::Summary(summary_frame(&snapshot, &config));
        let output = render_to_string(&frame);

        assert!(output.contains("WEEK 6"));
        assert!(output.contains("LIVE"));
        assert!(output.contains("45.0"));
        assert!(output.contains("PROJ"));
        assert!(output.contains("95.0"));
        assert!(!output.contains(BAR_GLYPH));
    }

    #[test]
    fn test_colorized_output_keeps_text() {
        let config = DisplayConfig::default();
        let frame = Frame::Matchup(matchup_frame(&sample_matchup(), &config));
        let mut renderer = TerminalRenderer::with_writer(Vec::new(), &config.panel).colorize(true);
        renderer.render(&frame).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(output.contains("TACO"));
        assert!(output.contains("BEEF"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "panel unplugged"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_render_error() {
        let config = DisplayConfig::default();
        let frame = Frame::Matchup(matchup_frame(&sample_matchup(), &config));
        let mut renderer = TerminalRenderer::with_writer(BrokenPipe, &config.panel);

        let err = renderer.render(&frame).unwrap_err();
        assert!(matches!(err, DisplayError::Render(_)));
    }
}
