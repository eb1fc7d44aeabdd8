//! Bottom status bar: panel hints, window position, last status message.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{direction_name, App, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = vec![Span::styled(
        " 1:Visibility 2:Equity 3:Path 4:Help",
        theme.muted(),
    )];

    spans.push(Span::raw(" | "));
    spans.push(Span::styled(
        format!(
            "{} bars {}..={} {} {}",
            app.result.symbol,
            app.window_start(),
            app.cursor,
            direction_name(app.direction),
            app.line_mode.label()
        ),
        theme.accent(),
    ));
    if app.result.synthetic {
        spans.push(Span::styled(" SYNTHETIC", theme.warning()));
    }

    if let Some((msg, level)) = &app.status_message {
        spans.push(Span::raw(" | "));
        let style = match level {
            StatusLevel::Info => theme.accent(),
            StatusLevel::Warning => theme.warning(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
