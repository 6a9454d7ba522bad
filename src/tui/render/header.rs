use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::tui::app::App;

/// Title and tagline
pub fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let lines = vec![
        Line::from(Span::styled(
            "Todo App",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Stay organized and productive with your personal task manager",
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Three cards: total, completed, progress
pub fn render_stats(frame: &mut Frame, app: &App, area: Rect) {
    let counts = app.counts();
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let theme = &app.theme;
    render_card(
        frame,
        app,
        cards[0],
        counts.total.to_string(),
        "Total Tasks",
        theme.text_bright,
    );
    render_card(
        frame,
        app,
        cards[1],
        counts.completed.to_string(),
        "Completed",
        theme.complete,
    );
    render_card(
        frame,
        app,
        cards[2],
        format!("{}%", counts.progress_percent()),
        "Progress",
        theme.pending,
    );
}

fn render_card(frame: &mut Frame, app: &App, area: Rect, value: String, label: &str, color: Color) {
    let bg = app.theme.background;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(app.theme.dim).bg(bg))
        .style(Style::default().bg(bg));
    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).bg(bg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}
