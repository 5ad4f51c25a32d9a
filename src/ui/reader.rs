use crate::app::App;
use crate::news::Article;
use crate::util::{format_relative_now, strip_control_chars, wrap_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::articles::category_color;

/// Render the article detail view.
pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(article) = app.detail.as_ref() else {
        let paragraph = Paragraph::new("No article selected")
            .block(Block::default().borders(Borders::ALL).title("Article"));
        f.render_widget(paragraph, area);
        return;
    };

    let width = area.width.saturating_sub(2) as usize;
    let lines = detail_lines(article, width);

    // Clamp before rendering so a resize never shows an out-of-range frame
    app.detail_visible_lines = area.height.saturating_sub(2) as usize;
    app.clamp_scroll(lines.len(), app.detail_visible_lines);

    // Paragraph scroll is u16; longer articles are cut at 65535 lines.
    const MAX_SCROLL: usize = u16::MAX as usize;
    let title = if lines.len() > app.detail_visible_lines {
        format!(
            "Article ({}/{})",
            app.scroll_offset.saturating_add(1),
            lines.len().saturating_sub(app.detail_visible_lines).saturating_add(1)
        )
    } else {
        "Article".to_string()
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((app.scroll_offset.min(MAX_SCROLL) as u16, 0));
    f.render_widget(paragraph, area);
}

/// Header (category, title, byline, source) followed by the wrapped body.
pub(super) fn detail_lines(article: &Article, width: usize) -> Vec<Line<'static>> {
    let meta = Style::default().fg(Color::DarkGray);
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        article.category.to_string(),
        Style::default()
            .fg(category_color(&article.category))
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    let title_style = Style::default().add_modifier(Modifier::BOLD);
    for line in wrap_to_width(&strip_control_chars(&article.title), width) {
        lines.push(Line::from(Span::styled(line, title_style)));
    }
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        format!("By {}", strip_control_chars(&article.author)),
        meta,
    )));
    lines.push(Line::from(Span::styled(
        format_relative_now(article.published_at),
        meta,
    )));
    lines.push(Line::from(Span::styled(
        format!("Source: {}", strip_control_chars(&article.source)),
        meta,
    )));
    lines.push(Line::from(""));

    lines.extend(
        wrap_to_width(&strip_control_chars(&article.content), width)
            .into_iter()
            .map(Line::from),
    );
    lines
}
