use serde::Serialize;

use crate::model::{Notification, Todo};
use crate::ops::Outcome;
use crate::ops::view::Counts;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub progress: u32,
}

#[derive(Serialize)]
pub struct OutcomeJson<'a> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<&'a Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<TodoJson>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn todo_to_json(todo: &Todo) -> TodoJson {
    TodoJson {
        id: todo.id.to_string(),
        text: todo.text.clone(),
        completed: todo.completed,
        created_at: todo.created_at.to_rfc3339(),
    }
}

pub fn stats_to_json(counts: &Counts) -> StatsJson {
    StatsJson {
        total: counts.total,
        active: counts.active,
        completed: counts.completed,
        progress: counts.progress_percent(),
    }
}

/// `todo` is the record the command touched, when it still exists
pub fn outcome_to_json<'a>(outcome: &'a Outcome, todo: Option<&Todo>) -> OutcomeJson<'a> {
    let status = match outcome {
        Outcome::Unchanged => "unchanged",
        Outcome::Applied(_) => "applied",
        Outcome::Failed(_) => "failed",
    };
    OutcomeJson {
        status,
        notification: outcome.notification(),
        todo: todo.map(todo_to_json),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// One line per todo: checkbox, short id, text
pub fn format_todo_line(todo: &Todo) -> String {
    let check = if todo.completed { 'x' } else { ' ' };
    format!("[{}] {}  {}", check, todo.id.short(), todo.text)
}

pub fn format_stats(counts: &Counts) -> Vec<String> {
    vec![
        format!("total:     {}", counts.total),
        format!("active:    {}", counts.active),
        format!("completed: {}", counts.completed),
        format!("progress:  {}%", counts.progress_percent()),
    ]
}

pub fn format_notification(notification: &Notification) -> String {
    format!("{} {}", notification.title, notification.description)
}
