use crate::io::store::{StoreError, TodoStore};
use crate::model::{Backend, Notification, Todo, TodoId, TodoPatch, normalize_text};
use crate::ops::command::Command;

/// Result of a list operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to do: blank text, unknown id, or no matching todos
    Unchanged,
    /// The store confirmed the change and the collection now reflects it
    Applied(Notification),
    /// The store call failed and the collection is untouched, or the todo
    /// turned out to be gone and its stale copy was dropped
    Failed(Notification),
}

impl Outcome {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Outcome::Unchanged => None,
            Outcome::Applied(n) | Outcome::Failed(n) => Some(n),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Error type for id lookups
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("todo not found: {0}")]
    NotFound(String),
    #[error("id prefix '{0}' matches more than one todo")]
    Ambiguous(String),
}

/// Owns the todo collection and keeps it in step with a store.
pub struct TodoList {
    store: Box<dyn TodoStore>,
    todos: Vec<Todo>,
}

impl TodoList {
    /// Load the collection from `store`.
    pub fn open(mut store: Box<dyn TodoStore>) -> Result<Self, StoreError> {
        let todos = store.load()?;
        Ok(TodoList { store, todos })
    }

    /// Newest first
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    pub fn backend(&self) -> Backend {
        self.store.backend()
    }

    /// Replace the collection with a fresh read from the store.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.todos = self.store.load()?;
        Ok(())
    }

    /// Find the single todo whose id starts with `prefix`.
    pub fn resolve_id(&self, prefix: &str) -> Result<TodoId, LookupError> {
        if let Some(todo) = self.todos.iter().find(|t| t.id.as_str() == prefix) {
            return Ok(todo.id.clone());
        }
        let mut matches = self
            .todos
            .iter()
            .filter(|t| !prefix.is_empty() && t.id.as_str().starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(todo), None) => Ok(todo.id.clone()),
            (Some(_), Some(_)) => Err(LookupError::Ambiguous(prefix.to_string())),
            (None, _) => Err(LookupError::NotFound(prefix.to_string())),
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        tracing::debug!(?command, "dispatch");
        match command {
            Command::Add(text) => self.add(&text),
            Command::Toggle(id) => self.toggle(&id),
            Command::Edit(id, text) => self.edit(&id, &text),
            Command::Delete(id) => self.delete(&id),
            Command::ClearCompleted => self.clear_completed(),
            Command::MarkAllComplete => self.mark_all_complete(),
        }
    }

    pub fn add(&mut self, text: &str) -> Outcome {
        let Some(text) = normalize_text(text) else {
            return Outcome::Unchanged;
        };
        match self.store.insert(&text) {
            Ok(todo) => {
                tracing::info!(id = %todo.id, "todo added");
                self.todos.insert(0, todo);
                Outcome::Applied(Notification::new(
                    "Todo added!",
                    "Your new task has been added successfully.",
                ))
            }
            Err(e) => failed("add todo", e),
        }
    }

    pub fn toggle(&mut self, id: &TodoId) -> Outcome {
        let Some(current) = self.get(id) else {
            return Outcome::Unchanged;
        };
        let patch = TodoPatch::completed(!current.completed);
        let confirmed = match self.store.update(std::slice::from_ref(id), &patch) {
            Ok(rows) => rows,
            Err(e) => return failed("update todo", e),
        };
        let Some(completed) = self.merge(confirmed).first().map(|t| t.completed) else {
            return self.vanished(id);
        };
        tracing::info!(%id, completed, "todo toggled");
        if completed {
            Outcome::Applied(Notification::new(
                "Task completed!",
                "Great job! Keep up the momentum.",
            ))
        } else {
            Outcome::Applied(Notification::new(
                "Task reactivated",
                "Task moved back to active.",
            ))
        }
    }

    pub fn edit(&mut self, id: &TodoId, text: &str) -> Outcome {
        let Some(text) = normalize_text(text) else {
            return Outcome::Unchanged;
        };
        if self.get(id).is_none() {
            return Outcome::Unchanged;
        }
        let confirmed = match self
            .store
            .update(std::slice::from_ref(id), &TodoPatch::text(text))
        {
            Ok(rows) => rows,
            Err(e) => return failed("update todo", e),
        };
        if self.merge(confirmed).is_empty() {
            return self.vanished(id);
        }
        tracing::info!(%id, "todo edited");
        Outcome::Applied(Notification::new(
            "Todo updated",
            "Your task has been successfully updated.",
        ))
    }

    pub fn delete(&mut self, id: &TodoId) -> Outcome {
        if self.get(id).is_none() {
            return Outcome::Unchanged;
        }
        if let Err(e) = self.store.delete(std::slice::from_ref(id)) {
            return failed("delete todo", e);
        }
        self.todos.retain(|t| &t.id != id);
        tracing::info!(%id, "todo deleted");
        Outcome::Applied(Notification::destructive(
            "Todo deleted",
            "The task has been removed from your list.",
        ))
    }

    pub fn clear_completed(&mut self) -> Outcome {
        let ids: Vec<TodoId> = self
            .todos
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id.clone())
            .collect();
        if ids.is_empty() {
            return Outcome::Unchanged;
        }
        if let Err(e) = self.store.delete(&ids) {
            return failed("clear completed tasks", e);
        }
        self.todos.retain(|t| !ids.contains(&t.id));
        let n = ids.len();
        tracing::info!(count = n, "completed todos cleared");
        Outcome::Applied(Notification::new(
            "Completed tasks cleared",
            format!("Removed {} completed {}.", n, plural_task(n)),
        ))
    }

    pub fn mark_all_complete(&mut self) -> Outcome {
        let ids: Vec<TodoId> = self
            .todos
            .iter()
            .filter(|t| !t.completed)
            .map(|t| t.id.clone())
            .collect();
        if ids.is_empty() {
            return Outcome::Unchanged;
        }
        let confirmed = match self.store.update(&ids, &TodoPatch::completed(true)) {
            Ok(rows) => rows,
            Err(e) => return failed("complete all tasks", e),
        };
        let n = self.merge(confirmed).len();
        if n == 0 {
            return Outcome::Unchanged;
        }
        tracing::info!(count = n, "todos marked complete");
        Outcome::Applied(Notification::new(
            "All tasks completed!",
            format!("Marked {} {} as complete.", n, plural_task(n)),
        ))
    }

    /// The store accepted an update but returned no row for `id`, so the
    /// todo was removed elsewhere. Drop the stale local copy.
    fn vanished(&mut self, id: &TodoId) -> Outcome {
        tracing::warn!(%id, "todo no longer exists in the store");
        self.todos.retain(|t| &t.id != id);
        Outcome::Failed(Notification::destructive(
            "Could not update todo",
            "The task no longer exists.",
        ))
    }

    /// Overwrite local records with their confirmed versions.
    /// Returns the confirmed records that matched a local todo.
    fn merge(&mut self, confirmed: Vec<Todo>) -> Vec<Todo> {
        let mut merged = Vec::with_capacity(confirmed.len());
        for row in confirmed {
            if let Some(slot) = self.todos.iter_mut().find(|t| t.id == row.id) {
                slot.text = row.text.clone();
                slot.completed = row.completed;
                merged.push(row);
            }
        }
        merged
    }
}

fn plural_task(n: usize) -> &'static str {
    if n > 1 { "tasks" } else { "task" }
}

fn failed(action: &str, err: StoreError) -> Outcome {
    tracing::error!(action, error = %err, "store call failed");
    Outcome::Failed(Notification::destructive(
        format!("Could not {}", action),
        err.to_string(),
    ))
}
