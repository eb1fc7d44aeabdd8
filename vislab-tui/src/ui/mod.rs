//! Top-level UI layout: one full-size panel plus a status bar.

pub mod equity_panel;
pub mod help_panel;
pub mod path_panel;
pub mod status_bar;
pub mod visibility_panel;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::app::{App, Panel};

use self::equity_panel::EquityPanel;
use self::help_panel::HelpPanel;
use self::path_panel::PathPanel;
use self::visibility_panel::VisibilityPanel;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    draw_panel(f, chunks[0], app);
    status_bar::render(f, chunks[1], app);
}

fn draw_panel(f: &mut Frame, area: Rect, app: &App) {
    let panel = app.active_panel;
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.panel_border(true))
        .title(format!(" {} [{}] ", panel.label(), panel.index() + 1))
        .title_style(theme.panel_title(true))
        .style(theme.canvas());
    let inner = block.inner(area);
    f.render_widget(block, area);

    match panel {
        Panel::Visibility => {
            let plot = app.visibility_plot();
            let title = format!(
                "{} {} visibility, bars {}..={}, path length {}",
                app.result.symbol,
                app.result.path_lengths.kind.label(),
                app.window_start(),
                app.cursor,
                fmt_stat(app.cursor_statistic())
            );
            let color = theme.direction_color(app.direction);
            f.render_widget(VisibilityPanel::new(&plot, &title, color, theme), inner);
        }
        Panel::Equity => f.render_widget(EquityPanel::new(&app.result.report, theme), inner),
        Panel::PathLength => f.render_widget(
            PathPanel::new(&app.result.path_lengths, app.cursor, theme),
            inner,
        ),
        Panel::Help => f.render_widget(HelpPanel::new(theme), inner),
    }
}

fn fmt_stat(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.4}")
    } else {
        "n/a".to_string()
    }
}

/// Flatten a buffer into one string, row by row.
#[cfg(test)]
pub(crate) fn buffer_text(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut content = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell((x, y)) {
                content.push_str(cell.symbol());
            }
        }
        content.push('\n');
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn every_panel_draws() {
        let mut app = test_app(60);
        for panel in Panel::ALL {
            app.active_panel = panel;
            let text = draw_text(&app);
            assert!(text.contains(panel.label()), "missing title for {panel:?}");
            assert!(text.contains("1:Visibility"));
        }
    }

    #[test]
    fn panel_area_uses_theme_background() {
        let mut app = test_app(60);
        app.active_panel = Panel::Help;
        let mut terminal = Terminal::new(TestBackend::new(100, 32)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        let buf = terminal.backend().buffer();
        assert_eq!(buf[(98, 29)].bg, app.theme.background);
        assert_eq!(buf[(0, 0)].bg, app.theme.background);
    }

    #[test]
    fn status_bar_shows_window_and_synthetic_tag() {
        let app = test_app(60);
        let text = draw_text(&app);
        assert!(text.contains("SYNTH bars 0..=11"));
        assert!(text.contains("SYNTHETIC"));
    }
}
