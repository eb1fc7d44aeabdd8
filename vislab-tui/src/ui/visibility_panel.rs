//! Panel 1: window series with lines of sight, and the node-arc diagram.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Widget,
    },
};
use vislab_runner::plot::VisibilityPlot;

use crate::theme::Theme;

/// Points per arc when drawing the arc diagram.
const ARC_STEPS: usize = 24;

pub struct VisibilityPanel<'a> {
    plot: &'a VisibilityPlot,
    title: &'a str,
    series_color: ratatui::style::Color,
    theme: &'a Theme,
}

impl<'a> VisibilityPanel<'a> {
    pub fn new(
        plot: &'a VisibilityPlot,
        title: &'a str,
        series_color: ratatui::style::Color,
        theme: &'a Theme,
    ) -> Self {
        Self {
            plot,
            title,
            series_color,
            theme,
        }
    }

    fn render_series(&self, area: Rect, buf: &mut Buffer) {
        let (x0, x1) = self.plot.x_extent();
        let (y0, y1) = self.plot.y_extent();
        let pad = ((y1 - y0).abs() * 0.08).max(1e-9);
        let times = self.plot.times();
        let values = self.plot.values();
        let coords: Vec<(f64, f64)> = times
            .iter()
            .zip(values)
            .filter(|(_, v)| v.is_finite())
            .map(|(&t, &v)| (t, v))
            .collect();
        let theme = self.theme;
        let series_color = self.series_color;

        Canvas::default()
            .block(
                Block::default()
                    .title(Span::styled(format!(" {} ", self.title), theme.accent_bold()))
                    .borders(Borders::ALL)
                    .border_style(theme.muted()),
            )
            .marker(Marker::Braille)
            .x_bounds([x0 - 0.5, x1 + 0.5])
            .y_bounds([y0 - pad, y1 + pad])
            .paint(|ctx| {
                for seg in self.plot.segments() {
                    ctx.draw(&CanvasLine::new(
                        seg.start.0,
                        seg.start.1,
                        seg.end.0,
                        seg.end.1,
                        theme.muted,
                    ));
                }
                ctx.layer();
                for pair in coords.windows(2) {
                    ctx.draw(&CanvasLine::new(
                        pair[0].0,
                        pair[0].1,
                        pair[1].0,
                        pair[1].1,
                        series_color,
                    ));
                }
                ctx.draw(&Points {
                    coords: &coords,
                    color: theme.text_primary,
                });
            })
            .render(area, buf);
    }

    fn render_arcs(&self, area: Rect, buf: &mut Buffer) {
        let (x0, x1) = self.plot.x_extent();
        let top = self.plot.max_arc_height().max(1.0) * 1.1;
        let nodes: Vec<(f64, f64)> = self.plot.times().iter().map(|&t| (t, 0.0)).collect();
        let theme = self.theme;
        let title = format!(" {} edges ", self.plot.arcs().len());

        Canvas::default()
            .block(
                Block::default()
                    .title(Span::styled(title, theme.muted()))
                    .borders(Borders::ALL)
                    .border_style(theme.muted()),
            )
            .marker(Marker::Braille)
            .x_bounds([x0 - 0.5, x1 + 0.5])
            .y_bounds([-0.05 * top, top])
            .paint(|ctx| {
                for arc in self.plot.arcs() {
                    let pts = arc.sample(ARC_STEPS);
                    for pair in pts.windows(2) {
                        ctx.draw(&CanvasLine::new(
                            pair[0].0,
                            pair[0].1,
                            pair[1].0,
                            pair[1].1,
                            theme.neutral,
                        ));
                    }
                }
                ctx.layer();
                ctx.draw(&Points {
                    coords: &nodes,
                    color: theme.accent,
                });
            })
            .render(area, buf);
    }
}

impl<'a> Widget for VisibilityPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.plot.values().is_empty() {
            Block::default()
                .title(format!(" {} [No Data] ", self.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .render(area, buf);
            return;
        }
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);
        self.render_series(chunks[0], buf);
        self.render_arcs(chunks[1], buf);
    }
}
