use crate::app::App;
use crate::news::Category;
use crate::util::{
    display_width, format_relative_now, single_line, strip_control_chars, truncate_to_width,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Badge color for a category.
pub(super) fn category_color(category: &Category) -> Color {
    match category {
        Category::Technology => Color::Cyan,
        Category::World => Color::Blue,
        Category::Business => Color::Green,
        Category::Health => Color::Magenta,
        Category::Sports => Color::Yellow,
        Category::Other(_) => Color::Gray,
    }
}

/// Render the article list: badge and title, excerpt, then author and age.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 3 || area.height < 3 {
        return;
    }

    let title = format!("Articles - {}", app.snapshot.filter.label());
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.snapshot.articles.is_empty() {
        let text = if app.snapshot.loading {
            "Loading news..."
        } else if !app.snapshot.online && app.snapshot.total == 0 {
            "No cached articles. Connect to the internet and press r to refresh."
        } else if app.snapshot.total == 0 {
            "No articles yet. Press r to refresh."
        } else {
            "No articles in this category."
        };
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // Inner width inside the borders
    let width = area.width.saturating_sub(2) as usize;

    let items: Vec<ListItem> = app
        .snapshot
        .articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let selected = i == app.selected;
            let badge = format!("[{}] ", article.category);
            let title_width = width.saturating_sub(display_width(&badge));

            let title_style = if selected {
                Style::default()
                    .bg(Color::DarkGray)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let title = strip_control_chars(&article.title);
            let excerpt = single_line(&strip_control_chars(&article.excerpt));
            let byline = format!(
                "{} · {}",
                strip_control_chars(&article.author),
                format_relative_now(article.published_at)
            );

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(badge, Style::default().fg(category_color(&article.category))),
                    Span::styled(truncate_to_width(&title, title_width).into_owned(), title_style),
                ]),
                Line::from(Span::raw(format!(
                    "  {}",
                    truncate_to_width(&excerpt, width.saturating_sub(2))
                ))),
                Line::from(Span::styled(
                    format!("  {}", truncate_to_width(&byline, width.saturating_sub(2))),
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(""),
            ])
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}
