pub mod filter_bar;
pub mod header;
pub mod status_row;
pub mod todo_list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::App;

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + subtitle
            Constraint::Length(4), // stats cards
            Constraint::Length(1), // filter tabs
            Constraint::Length(1), // bulk actions
            Constraint::Length(1), // add form
            Constraint::Min(1),    // todo list
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_title(frame, app, chunks[0]);
    header::render_stats(frame, app, chunks[1]);
    filter_bar::render_filter_bar(frame, app, chunks[2]);
    filter_bar::render_actions(frame, app, chunks[3]);
    todo_list::render_add_form(frame, app, chunks[4]);
    todo_list::render_todo_list(frame, app, chunks[5]);
    status_row::render_status_row(frame, app, chunks[6]);
}
