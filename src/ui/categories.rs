use crate::app::App;
use crate::news::CategoryFilter;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::articles::category_color;

/// Render the category filter bar as a row of chips, the active one highlighted.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let active = &app.snapshot.filter;
    let mut spans = Vec::with_capacity(CategoryFilter::choices().len() * 2);

    for choice in CategoryFilter::choices() {
        let color = match &choice {
            CategoryFilter::All => Color::White,
            CategoryFilter::Only(category) => category_color(category),
        };
        let style = if &choice == active {
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        spans.push(Span::styled(format!(" {} ", choice.label()), style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Categories (h/l)"),
    );
    f.render_widget(paragraph, area);
}
