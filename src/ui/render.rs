//! Render functions for the TUI.
//!
//! Dispatches to the list or detail view and draws the shared header and
//! status bar around it.

use crate::app::{App, View};
use crate::util::format_relative_now;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{articles, categories, reader, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 10;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Main render dispatch function.
///
/// Handles terminal size validation before rendering.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let show_bar = app.show_filter_bar && app.view == View::List;
    let mut constraints = vec![Constraint::Length(1)];
    if show_bar {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(f, app, chunks[0]);
    let body = if show_bar {
        categories::render(f, app, chunks[1]);
        chunks[2]
    } else {
        chunks[1]
    };

    match app.view {
        View::List => articles::render(f, app, body),
        View::Detail => reader::render(f, app, body),
    }
    status::render(f, app, chunks[chunks.len() - 1]);
}

/// One-line header: name, article count, connectivity badge, cache age.
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let view = &app.snapshot;
    let mut spans = vec![
        Span::styled(
            " newsdesk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} articles ", view.articles.len())),
    ];

    if view.online {
        spans.push(Span::styled(" ONLINE ", Style::default().fg(Color::Black).bg(Color::Green)));
    } else {
        spans.push(Span::styled(" OFFLINE ", Style::default().fg(Color::White).bg(Color::Red)));
    }

    if let Some(updated) = view.last_update {
        spans.push(Span::styled(
            format!("  Updated {}", format_relative_now(updated)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if view.loading {
        let frame = SPINNER[app.spinner_frame % SPINNER.len()];
        let label = if view.refreshing { "Refreshing" } else { "Loading" };
        spans.push(Span::styled(
            format!("  {} {}...", frame, label),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::FixtureSource;
    use crate::storage::MemoryStore;
    use crate::sync::SyncCache;
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;
    use std::time::Duration;

    async fn loaded_app() -> App {
        let source = Arc::new(FixtureSource::builtin(Duration::ZERO));
        let (sync, _advisories) = SyncCache::new(source, Arc::new(MemoryStore::new()), true);
        let sync = Arc::new(sync);
        sync.load().await.unwrap();
        App::new(sync, None)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[tokio::test]
    async fn test_list_view_renders_header_and_articles() {
        let mut app = loaded_app().await;
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("newsdesk"));
        assert!(text.contains("6 articles"));
        assert!(text.contains("ONLINE"));
        assert!(text.contains("React Native 0.75"));
    }

    #[tokio::test]
    async fn test_detail_view_renders_byline() {
        let mut app = loaded_app().await;
        app.open_detail();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();

        let text = screen(&terminal);
        assert!(text.contains("By Sarah Johnson"));
        assert!(text.contains("Source: Tech News Daily"));
        assert!(app.detail_visible_lines > 0);
    }

    #[tokio::test]
    async fn test_small_terminal_message() {
        let mut app = loaded_app().await;
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal.draw(|f| render(f, &mut app)).unwrap();
        assert!(screen(&terminal).contains("Terminal too small"));
    }
}
