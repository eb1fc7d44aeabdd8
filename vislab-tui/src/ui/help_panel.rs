//! Panel 4: keyboard shortcuts.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;

pub struct HelpPanel<'a> {
    theme: &'a Theme,
}

impl<'a> HelpPanel<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    fn section(&self, lines: &mut Vec<Line<'static>>, title: &str) {
        lines.push(Line::from(Span::styled(title.to_string(), self.theme.accent_bold())));
    }

    fn key(&self, lines: &mut Vec<Line<'static>>, keys: &str, desc: &str) {
        lines.push(Line::from(vec![
            Span::styled(format!("  {keys:>16}  "), self.theme.accent()),
            Span::styled(desc.to_string(), self.theme.secondary()),
        ]));
    }
}

impl<'a> Widget for HelpPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut lines = Vec::new();

        self.section(&mut lines, "Global Navigation");
        self.key(&mut lines, "1-4", "Switch to panel by number");
        self.key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
        self.key(&mut lines, "q / Esc", "Quit");
        lines.push(Line::from(""));

        self.section(&mut lines, "Panels 1 and 3: Visibility / Path Length");
        self.key(&mut lines, "h / l", "Move window one bar back / forward");
        self.key(&mut lines, "H / L", "Move window ten bars");
        self.key(&mut lines, "Home / End", "First / last complete window");
        self.key(&mut lines, "n", "Toggle positive / negated series");
        self.key(&mut lines, "m", "Toggle diagonal / horizontal lines of sight");
        self.key(&mut lines, "g / G", "Jump to max / min path length window");
        lines.push(Line::from(""));

        self.section(&mut lines, "Panel 2: Equity");
        self.key(&mut lines, "", "Cumulative log return per leg with profit factors");
        lines.push(Line::from(""));

        self.section(&mut lines, "Signals");
        self.key(&mut lines, "Long", "pos > neg at the bar: +1, else 0");
        self.key(&mut lines, "Short", "pos < neg at the bar: -1, else 0");
        self.key(&mut lines, "Combined", "Long + Short");

        Paragraph::new(lines).render(area, buf);
    }
}
