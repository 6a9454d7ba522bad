use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::FilterType;
use crate::tui::app::App;

/// Filter tabs with per-filter counts, the active one highlighted
pub fn render_filter_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let counts = app.counts();
    let mut spans = Vec::new();
    for (i, filter) in FilterType::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ", Style::default().bg(bg)));
        }
        let label = format!(" {} ({}) ", filter.label(), counts.for_filter(*filter));
        let style = if *filter == app.filter {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        spans.push(Span::styled(label, style));
    }
    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Bulk actions, only shown once there is something in the list
pub fn render_actions(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let counts = app.counts();
    if counts.total == 0 {
        return;
    }

    let action_style = |enabled: bool, color| {
        if enabled {
            Style::default().fg(color).bg(bg)
        } else {
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::DIM)
        }
    };
    let spans = vec![
        Span::styled(
            "C Complete All",
            action_style(counts.active > 0, app.theme.complete),
        ),
        Span::styled("    ", Style::default().bg(bg)),
        Span::styled(
            "X Clear Completed",
            action_style(counts.completed > 0, app.theme.destructive),
        ),
    ];
    let paragraph = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
