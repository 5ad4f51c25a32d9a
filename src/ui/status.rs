use crate::app::{App, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.snapshot.refreshing {
        Cow::Borrowed("Refreshing...")
    } else {
        match app.view {
            View::List => {
                if app.manual_monitor.is_some() {
                    Cow::Borrowed("[j/k]move [Enter]open [c]ategories [h/l]filter [r]efresh [o]nline/offline [q]uit")
                } else {
                    Cow::Borrowed("[j/k]move [Enter]open [c]ategories [h/l]filter [r]efresh [q]uit")
                }
            }
            View::Detail => Cow::Borrowed("[b]ack [j/k]scroll [Ctrl+d/u]page [r]efresh [q]uit"),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}
