use serde::Serialize;

use crate::model::{FilterType, Todo};

/// Aggregate counts over the whole collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    /// Completed share as a whole percentage; 0 for an empty list
    pub fn progress_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }

    /// The count shown next to a filter tab
    pub fn for_filter(&self, filter: FilterType) -> usize {
        match filter {
            FilterType::All => self.total,
            FilterType::Active => self.active,
            FilterType::Completed => self.completed,
        }
    }
}

/// Visible todos for `filter`, in collection order
pub fn filter_todos(todos: &[Todo], filter: FilterType) -> Vec<&Todo> {
    todos.iter().filter(|t| filter.matches(t)).collect()
}

pub fn counts(todos: &[Todo]) -> Counts {
    let completed = todos.iter().filter(|t| t.completed).count();
    Counts {
        total: todos.len(),
        active: todos.len() - completed,
        completed,
    }
}

/// Heading and hint shown when a filter matches nothing
pub fn empty_message(filter: FilterType) -> (&'static str, &'static str) {
    match filter {
        FilterType::All => ("No todos yet", "Add your first todo above to get started!"),
        FilterType::Active => ("No active todos", "All tasks are completed! Great job!"),
        FilterType::Completed => ("No completed todos", "Complete some tasks to see them here."),
    }
}
