//! Panel 3: positive and negated path-length statistic with the cursor.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Widget},
};
use vislab_core::{Direction, PathLengths};

use crate::theme::Theme;

pub struct PathPanel<'a> {
    path_lengths: &'a PathLengths,
    cursor: usize,
    theme: &'a Theme,
}

impl<'a> PathPanel<'a> {
    pub fn new(path_lengths: &'a PathLengths, cursor: usize, theme: &'a Theme) -> Self {
        Self {
            path_lengths,
            cursor,
            theme,
        }
    }
}

fn finite_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

impl<'a> Widget for PathPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pl = self.path_lengths;
        let pos = finite_points(&pl.positive);
        let neg = finite_points(&pl.negative);
        let (lo, hi) = pos
            .iter()
            .chain(&neg)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, v)| {
                (lo.min(v), hi.max(v))
            });
        let (lo, hi) = if lo.is_finite() { (lo, hi) } else { (0.0, 1.0) };
        let pad = ((hi - lo) * 0.05).max(1e-6);
        let x_max = pl.len().saturating_sub(1).max(1) as f64;
        let cursor = [(self.cursor as f64, lo - pad), (self.cursor as f64, hi + pad)];

        let datasets = vec![
            Dataset::default()
                .name(Direction::Negative.label())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.direction_color(Direction::Negative)))
                .data(&neg),
            Dataset::default()
                .name(Direction::Positive.label())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(self.theme.direction_color(Direction::Positive)))
                .data(&pos),
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(self.theme.warning())
                .data(&cursor),
        ];

        let title = format!(
            " Avg shortest path ({}, lookback {}) ",
            pl.kind.label(),
            pl.lookback
        );
        Chart::new(datasets)
            .block(
                Block::default()
                    .title(Span::styled(title, self.theme.accent_bold()))
                    .borders(Borders::ALL)
                    .border_style(self.theme.muted()),
            )
            .legend_position(Some(LegendPosition::TopLeft))
            .x_axis(
                Axis::default()
                    .title(Span::styled("Data Point", self.theme.muted()))
                    .style(self.theme.muted())
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::styled("0", self.theme.muted()),
                        Span::styled(format!("{}", pl.len().saturating_sub(1)), self.theme.muted()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.muted())
                    .bounds([lo - pad, hi + pad])
                    .labels(vec![
                        Span::styled(format!("{:.2}", lo - pad), self.theme.muted()),
                        Span::styled(format!("{:.2}", hi + pad), self.theme.muted()),
                    ]),
            )
            .render(area, buf);
    }
}
