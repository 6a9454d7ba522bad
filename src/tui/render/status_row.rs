use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::util::unicode;

const NAVIGATE_HINTS: &str = "a add  space toggle  e edit  d delete  tab filter  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Navigate => {
            if let Some(toast) = &app.toast {
                let color = app.theme.notification_color(toast.notification.variant);
                let title = unicode::truncate_to_width(&toast.notification.title, width);
                let mut spans = vec![Span::styled(
                    title.clone(),
                    Style::default()
                        .fg(color)
                        .bg(bg)
                        .add_modifier(Modifier::BOLD),
                )];
                let used = unicode::display_width(&title) + 2;
                if used < width {
                    spans.push(Span::styled(
                        format!(
                            "  {}",
                            unicode::truncate_to_width(&toast.notification.description, width - used)
                        ),
                        Style::default().fg(app.theme.text).bg(bg),
                    ));
                }
                Line::from(spans)
            } else if app.show_key_hints {
                right_aligned(Vec::new(), NAVIGATE_HINTS, width, app)
            } else {
                Line::from(Span::styled(" ".repeat(width), Style::default().bg(bg)))
            }
        }
        Mode::Add => right_aligned(
            vec![Span::styled(
                "new todo",
                Style::default().fg(app.theme.highlight).bg(bg),
            )],
            "Enter add  Esc done",
            width,
            app,
        ),
        Mode::Edit(_) => right_aligned(
            vec![Span::styled(
                "editing",
                Style::default().fg(app.theme.highlight).bg(bg),
            )],
            "Enter save  Esc cancel",
            width,
            app,
        ),
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Pad between the left spans and a dim hint pinned to the right edge
fn right_aligned<'a>(mut spans: Vec<Span<'a>>, hint: &'a str, width: usize, app: &App) -> Line<'a> {
    let bg = app.theme.background;
    let content_width: usize = spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum();
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
        spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
    }
    Line::from(spans)
}
