//! Panel 2: cumulative log returns of the long, short and combined legs.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph, Widget},
};
use vislab_core::signals::Leg;
use vislab_core::BacktestReport;

use crate::theme::Theme;

pub struct EquityPanel<'a> {
    report: &'a BacktestReport,
    theme: &'a Theme,
}

impl<'a> EquityPanel<'a> {
    pub fn new(report: &'a BacktestReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }

    fn summary_line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(7);
        for leg in Leg::ALL {
            let pf = self.report.leg(leg).profit_factor;
            spans.push(Span::styled(format!(" {} PF ", leg.label()), self.theme.muted()));
            spans.push(Span::styled(
                fmt_pf(pf),
                Style::default().fg(self.theme.pf_color(pf)),
            ));
        }
        let e = self.report.exposure;
        spans.push(Span::styled(
            format!(
                "   exposure {}L/{}S/{}F",
                e.long_bars, e.short_bars, e.flat_bars
            ),
            self.theme.muted(),
        ));
        Line::from(spans)
    }
}

pub(crate) fn fmt_pf(pf: f64) -> String {
    if pf.is_infinite() {
        "inf".to_string()
    } else {
        format!("{pf:.4}")
    }
}

impl<'a> Widget for EquityPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(3)])
            .split(area);
        Paragraph::new(self.summary_line()).render(chunks[0], buf);

        let n = self.report.log_returns.len();
        let curves: Vec<Vec<(f64, f64)>> = Leg::ALL
            .iter()
            .map(|&leg| {
                self.report
                    .leg(leg)
                    .cumulative
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| v.is_finite())
                    .map(|(i, &v)| (i as f64, v))
                    .collect()
            })
            .collect();
        let (lo, hi) = curves
            .iter()
            .flatten()
            .fold((0.0f64, 0.0f64), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v)));
        let pad = ((hi - lo) * 0.05).max(1e-6);
        let x_max = n.saturating_sub(1).max(1) as f64;

        let datasets: Vec<Dataset> = Leg::ALL
            .iter()
            .zip(&curves)
            .map(|(&leg, data)| {
                Dataset::default()
                    .name(leg.label())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.theme.leg_color(leg)))
                    .data(data)
            })
            .collect();

        Chart::new(datasets)
            .block(
                Block::default()
                    .title(Span::styled(" Cumulative log return ", self.theme.accent_bold()))
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
                        Span::styled(format!("{}", n.saturating_sub(1)), self.theme.muted()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled("Log Returns", self.theme.muted()))
                    .style(self.theme.muted())
                    .bounds([lo - pad, hi + pad])
                    .labels(vec![
                        Span::styled(format!("{:.3}", lo - pad), self.theme.muted()),
                        Span::styled(format!("{:.3}", hi + pad), self.theme.muted()),
                    ]),
            )
            .render(chunks[1], buf);
    }
}
