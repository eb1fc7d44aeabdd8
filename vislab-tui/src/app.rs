//! Application state: single-owner, main-thread only.

use vislab_core::Direction;
use vislab_runner::plot::{LineMode, VisibilityPlot};
use vislab_runner::{find_extremes, AnalysisResult, WindowExtremes};

use crate::theme::Theme;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Visibility,
    Equity,
    PathLength,
    Help,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Visibility,
        Panel::Equity,
        Panel::PathLength,
        Panel::Help,
    ];

    pub fn index(self) -> usize {
        match self {
            Panel::Visibility => 0,
            Panel::Equity => 1,
            Panel::PathLength => 2,
            Panel::Help => 3,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Visibility => "Visibility",
            Panel::Equity => "Equity",
            Panel::PathLength => "Path Length",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Panel {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

/// All TUI state.
pub struct App {
    pub running: bool,
    pub active_panel: Panel,
    pub result: AnalysisResult,
    /// Last bar of the window on display.
    pub cursor: usize,
    pub direction: Direction,
    pub line_mode: LineMode,
    pub status_message: Option<(String, StatusLevel)>,
    pub theme: Theme,
    extremes: Option<WindowExtremes>,
}

impl App {
    pub fn new(result: AnalysisResult) -> Self {
        let extremes = find_extremes(
            &result.path_lengths.positive,
            result.lookback(),
            &result.closes,
        );
        let cursor = result.lookback().saturating_sub(1).min(result.bar_count().saturating_sub(1));
        Self {
            running: true,
            active_panel: Panel::Visibility,
            result,
            cursor,
            direction: Direction::Positive,
            line_mode: LineMode::Diagonal,
            status_message: None,
            theme: Theme::default(),
            extremes,
        }
    }

    pub fn lookback(&self) -> usize {
        self.result.lookback()
    }

    /// Smallest cursor that shows a complete window.
    fn min_cursor(&self) -> usize {
        self.lookback()
            .saturating_sub(1)
            .min(self.result.bar_count().saturating_sub(1))
    }

    fn max_cursor(&self) -> usize {
        self.result.bar_count().saturating_sub(1)
    }

    /// First bar of the window on display.
    pub fn window_start(&self) -> usize {
        (self.cursor + 1).saturating_sub(self.lookback())
    }

    /// Closes of the window on display, oriented by `direction`.
    pub fn window_values(&self) -> Vec<f64> {
        if self.result.closes.is_empty() {
            return Vec::new();
        }
        self.direction
            .orient(&self.result.closes[self.window_start()..=self.cursor])
    }

    pub fn visibility_plot(&self) -> VisibilityPlot {
        VisibilityPlot::from_values(
            self.result.path_lengths.kind,
            &self.window_values(),
            self.line_mode,
        )
    }

    /// Statistic at the cursor for the current direction.
    pub fn cursor_statistic(&self) -> f64 {
        self.result
            .path_lengths
            .series(self.direction)
            .get(self.cursor)
            .copied()
            .unwrap_or(f64::NAN)
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor as isize + delta;
        let lo = self.min_cursor() as isize;
        let hi = self.max_cursor() as isize;
        self.cursor = target.clamp(lo, hi.max(lo)) as usize;
    }

    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.flip();
        self.set_status(format!("Series: {}", direction_name(self.direction)));
    }

    pub fn toggle_line_mode(&mut self) {
        self.line_mode = self.line_mode.toggle();
        self.set_status(format!("Lines: {}", self.line_mode.label()));
    }

    pub fn jump_to_max(&mut self) {
        match &self.extremes {
            Some(e) => {
                self.cursor = e.max.index;
                let msg = format!("Max path length {:.4} at bar {}", e.max.value, e.max.index);
                self.set_status(msg);
            }
            None => self.set_warning("No complete window".into()),
        }
    }

    pub fn jump_to_min(&mut self) {
        match &self.extremes {
            Some(e) => {
                self.cursor = e.min.index;
                let msg = format!("Min path length {:.4} at bar {}", e.min.value, e.min.index);
                self.set_status(msg);
            }
            None => self.set_warning("No complete window".into()),
        }
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: String) {
        self.status_message = Some((msg, StatusLevel::Warning));
    }
}

pub fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Positive => "positive",
        Direction::Negative => "negated",
    }
}
