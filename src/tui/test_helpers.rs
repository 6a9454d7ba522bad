use chrono::{DateTime, Duration, Utc};
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::io::local_store::{LocalStore, encode_todos};
use crate::io::storage::MemoryStorage;
use crate::io::store::STORAGE_KEY;
use crate::model::{AppConfig, Todo, TodoId};
use crate::ops::TodoList;
use crate::tui::app::App;
use crate::tui::render;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Todos in display order (newest first), ids `t0`, `t1`, ...
pub fn todos(items: &[(&str, bool)]) -> Vec<Todo> {
    let base: DateTime<Utc> = "2025-05-14T12:00:00Z".parse().unwrap();
    items
        .iter()
        .enumerate()
        .map(|(i, (text, completed))| Todo {
            id: TodoId::new(format!("t{}", i)),
            text: text.to_string(),
            completed: *completed,
            created_at: base - Duration::minutes(i as i64),
        })
        .collect()
}

/// A list backed by in-memory storage seeded with `items`.
pub fn list_with_todos(items: &[(&str, bool)]) -> TodoList {
    let raw = encode_todos(&todos(items)).unwrap();
    let store = LocalStore::new(MemoryStorage::with_item(STORAGE_KEY, &raw), STORAGE_KEY);
    TodoList::open(Box::new(store)).unwrap()
}

pub fn app_with_todos(items: &[(&str, bool)]) -> App {
    App::new(list_with_todos(items), &AppConfig::default())
}

/// Render the whole app into an in-memory buffer and return plain text (no styles).
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| render::render(frame, app)).unwrap();

    let buf = terminal.backend().buffer().clone();
    let width = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(width)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}
