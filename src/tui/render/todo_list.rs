use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Todo;
use crate::ops::view;
use crate::tui::app::{App, Mode};
use crate::util::unicode::{display_width, truncate_to_width};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
const MARKER_WIDTH: usize = 2;
const CHECKBOX_WIDTH: usize = 4;

/// The add form: live input in add mode, a prompt otherwise
pub fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let line = if app.mode == Mode::Add {
        let cursor_x = area.x + 2 + app.input.cursor_col() as u16;
        if cursor_x < area.x + area.width {
            frame.set_cursor_position(Position::new(cursor_x, area.y));
        }
        Line::from(vec![
            Span::styled(
                "+ ",
                Style::default()
                    .fg(app.theme.highlight)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                app.input.text().to_string(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "+ Add a new todo... (a)",
            Style::default().fg(app.theme.dim).bg(bg),
        ))
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// The filtered list, scrolled so the cursor row stays on screen
pub fn render_todo_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let height = area.height as usize;
    if height == 0 || area.width == 0 {
        return;
    }

    let visible_len = app.visible().len();
    if visible_len == 0 {
        app.scroll_offset = 0;
        render_empty(frame, app, area);
        return;
    }

    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }
    app.scroll_offset = app.scroll_offset.min(visible_len.saturating_sub(height));

    let width = area.width as usize;
    let visible = app.visible();
    let mut cursor_position = None;
    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .map(|(i, todo)| {
            let selected = i == app.cursor;
            let editing = matches!(&app.mode, Mode::Edit(id) if *id == todo.id);
            if editing {
                let row = (i - app.scroll_offset) as u16;
                let x = area.x + (MARKER_WIDTH + CHECKBOX_WIDTH + app.input.cursor_col()) as u16;
                if x < area.x + area.width {
                    cursor_position = Some(Position::new(x, area.y + row));
                }
            }
            todo_row(app, todo, selected, editing, width)
        })
        .collect();

    if let Some(pos) = cursor_position {
        frame.set_cursor_position(pos);
    }
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn todo_row(app: &App, todo: &Todo, selected: bool, editing: bool, width: usize) -> Line<'static> {
    let theme = &app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };

    let marker = if selected { "\u{25B8} " } else { "  " };
    let (checkbox, check_color) = if todo.completed {
        ("[x] ", theme.complete)
    } else {
        ("[ ] ", theme.pending)
    };
    let mut spans = vec![
        Span::styled(marker, Style::default().fg(theme.highlight).bg(row_bg)),
        Span::styled(checkbox, Style::default().fg(check_color).bg(row_bg)),
    ];

    let date = todo
        .created_at
        .with_timezone(&Local)
        .format(DATE_FORMAT)
        .to_string();
    let fixed = MARKER_WIDTH + CHECKBOX_WIDTH;
    let date_width = display_width(&date) + 2;
    let show_date = !editing && width >= fixed + date_width + 8;
    let text_budget = width
        .saturating_sub(fixed)
        .saturating_sub(if show_date { date_width } else { 0 });

    let text = if editing {
        app.input.text().to_string()
    } else {
        todo.text.clone()
    };
    let text = truncate_to_width(&text, text_budget);
    let text_style = if editing {
        Style::default().fg(theme.text_bright).bg(row_bg)
    } else if todo.completed {
        Style::default()
            .fg(theme.dim)
            .bg(row_bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(theme.text).bg(row_bg)
    };
    let text_width = display_width(&text);
    spans.push(Span::styled(text, text_style));

    if show_date {
        let padding = width - fixed - text_width - display_width(&date);
        spans.push(Span::styled(" ".repeat(padding), Style::default().bg(row_bg)));
        spans.push(Span::styled(date, Style::default().fg(theme.dim).bg(row_bg)));
    }
    Line::from(spans)
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let (heading, hint) = view::empty_message(app.filter);
    let top = area.height.saturating_sub(2) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(
        heading,
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
