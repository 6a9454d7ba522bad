use std::collections::HashSet;

use crate::io::storage::Storage;
use crate::io::store::{StoreError, TodoStore};
use crate::model::{Backend, Todo, TodoId, TodoPatch};

/// Why a stored todo list was rejected on load
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("todo {0} has empty text")]
    EmptyText(TodoId),
    #[error("duplicate todo id {0}")]
    DuplicateId(TodoId),
}

/// Parse and validate a serialized todo list.
pub fn decode_todos(raw: &str) -> Result<Vec<Todo>, DecodeError> {
    let todos: Vec<Todo> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    for todo in &todos {
        if todo.text.trim().is_empty() {
            return Err(DecodeError::EmptyText(todo.id.clone()));
        }
        if !seen.insert(&todo.id) {
            return Err(DecodeError::DuplicateId(todo.id.clone()));
        }
    }
    Ok(todos)
}

pub fn encode_todos(todos: &[Todo]) -> Result<String, serde_json::Error> {
    serde_json::to_string(todos)
}

/// Todo list kept as a single serialized array under one storage key.
///
/// Each mutation rewrites the whole array.
pub struct LocalStore<S: Storage> {
    storage: S,
    key: String,
    todos: Vec<Todo>,
}

impl<S: Storage> LocalStore<S> {
    pub fn new(storage: S, key: &str) -> Self {
        LocalStore {
            storage,
            key: key.to_string(),
            todos: Vec::new(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn write(&mut self, next: Vec<Todo>) -> Result<(), StoreError> {
        let raw = encode_todos(&next)?;
        self.storage
            .set_item(&self.key, &raw)
            .map_err(|e| StoreError::Storage {
                key: self.key.clone(),
                source: e,
            })?;
        self.todos = next;
        Ok(())
    }
}

impl<S: Storage> TodoStore for LocalStore<S> {
    fn load(&mut self) -> Result<Vec<Todo>, StoreError> {
        let raw = self
            .storage
            .get_item(&self.key)
            .map_err(|e| StoreError::Storage {
                key: self.key.clone(),
                source: e,
            })?;
        self.todos = match raw {
            None => Vec::new(),
            Some(raw) => match decode_todos(&raw) {
                Ok(todos) => todos,
                Err(e) => {
                    tracing::warn!(key = %self.key, error = %e, "ignoring unreadable todo list");
                    Vec::new()
                }
            },
        };
        tracing::debug!(count = self.todos.len(), "loaded local todos");
        Ok(self.todos.clone())
    }

    fn insert(&mut self, text: &str) -> Result<Todo, StoreError> {
        let todo = Todo::new(TodoId::generate(), text.to_string());
        let mut next = Vec::with_capacity(self.todos.len() + 1);
        next.push(todo.clone());
        next.extend(self.todos.iter().cloned());
        self.write(next)?;
        Ok(todo)
    }

    fn update(&mut self, ids: &[TodoId], patch: &TodoPatch) -> Result<Vec<Todo>, StoreError> {
        let mut next = self.todos.clone();
        let mut updated = Vec::new();
        for todo in next.iter_mut().filter(|t| ids.contains(&t.id)) {
            todo.apply(patch);
            updated.push(todo.clone());
        }
        if !updated.is_empty() {
            self.write(next)?;
        }
        Ok(updated)
    }

    fn delete(&mut self, ids: &[TodoId]) -> Result<(), StoreError> {
        let next: Vec<Todo> = self
            .todos
            .iter()
            .filter(|t| !ids.contains(&t.id))
            .cloned()
            .collect();
        if next.len() != self.todos.len() {
            self.write(next)?;
        }
        Ok(())
    }

    fn backend(&self) -> Backend {
        Backend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::storage::{DirStorage, MemoryStorage};
    use crate::io::store::STORAGE_KEY;
    use crate::ops::{Outcome, TodoList};
    use pretty_assertions::assert_eq;
    use std::io;
    use tempfile::TempDir;

    /// Serves reads from memory and rejects every write
    struct ReadOnlyStorage(MemoryStorage);

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, key: &str) -> io::Result<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&mut self, _key: &str, _value: &str) -> io::Result<()> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            ))
        }
    }

    fn read_only_with(texts: &[&str]) -> (LocalStore<ReadOnlyStorage>, Vec<Todo>) {
        let todos: Vec<Todo> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| Todo::new(TodoId::new(format!("t{}", i)), text.to_string()))
            .collect();
        let raw = encode_todos(&todos).unwrap();
        let storage = ReadOnlyStorage(MemoryStorage::with_item(STORAGE_KEY, &raw));
        (LocalStore::new(storage, STORAGE_KEY), todos)
    }

    fn stored(raw: &str) -> LocalStore<MemoryStorage> {
        LocalStore::new(MemoryStorage::with_item(STORAGE_KEY, raw), STORAGE_KEY)
    }

    #[test]
    fn load_missing_entry_is_empty() {
        let mut store = LocalStore::new(MemoryStorage::new(), STORAGE_KEY);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn load_reconstructs_timestamps_from_iso_strings() {
        let raw = r#"[
            {"id":"a1","text":"Buy milk","completed":false,"createdAt":"2025-05-14T09:30:00.000Z"},
            {"id":"b2","text":"Walk dog","completed":true,"createdAt":"2025-05-13T18:05:12.345Z"}
        ]"#;
        let todos = stored(raw).load().unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].text, "Buy milk");
        assert_eq!(
            todos[0].created_at,
            "2025-05-14T09:30:00Z".parse::<chrono::DateTime<chrono::Utc>>().unwrap()
        );
        assert!(todos[1].completed);
    }

    #[test]
    fn malformed_json_loads_as_empty() {
        let mut store = stored("not json {{{");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_loads_as_empty() {
        let mut store = stored(r#"[{"id":"a","title":"no text field"}]"#);
        assert!(store.load().unwrap().is_empty());

        let mut store = stored(r#"{"todos":[]}"#);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn blank_text_is_a_schema_violation() {
        let raw = r#"[{"id":"a","text":"   ","completed":false,"createdAt":"2025-05-14T09:30:00Z"}]"#;
        assert!(matches!(decode_todos(raw), Err(DecodeError::EmptyText(_))));
        assert!(stored(raw).load().unwrap().is_empty());
    }

    #[test]
    fn duplicate_ids_are_a_schema_violation() {
        let raw = r#"[
            {"id":"a","text":"one","completed":false,"createdAt":"2025-05-14T09:30:00Z"},
            {"id":"a","text":"two","completed":false,"createdAt":"2025-05-14T09:31:00Z"}
        ]"#;
        assert!(matches!(decode_todos(raw), Err(DecodeError::DuplicateId(_))));
    }

    #[test]
    fn missing_completed_defaults_to_false() {
        let raw = r#"[{"id":"a","text":"one","createdAt":"2025-05-14T09:30:00Z"}]"#;
        let todos = decode_todos(raw).unwrap();
        assert!(!todos[0].completed);
    }

    #[test]
    fn insert_prepends_and_persists() {
        let mut store = LocalStore::new(MemoryStorage::new(), STORAGE_KEY);
        store.load().unwrap();
        let first = store.insert("first").unwrap();
        let second = store.insert("second").unwrap();

        let raw = store.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        let persisted = decode_todos(&raw).unwrap();
        assert_eq!(persisted, vec![second, first]);
    }

    #[test]
    fn update_returns_confirmed_records() {
        let mut store = LocalStore::new(MemoryStorage::new(), STORAGE_KEY);
        let a = store.insert("a").unwrap();
        let b = store.insert("b").unwrap();

        let updated = store
            .update(&[a.id.clone()], &TodoPatch::completed(true))
            .unwrap();
        assert_eq!(updated.len(), 1);
        assert!(updated[0].completed);

        let reloaded = store.load().unwrap();
        assert!(!reloaded.iter().find(|t| t.id == b.id).unwrap().completed);
        assert!(reloaded.iter().find(|t| t.id == a.id).unwrap().completed);
    }

    #[test]
    fn update_unknown_id_confirms_nothing() {
        let mut store = LocalStore::new(MemoryStorage::new(), STORAGE_KEY);
        store.insert("a").unwrap();
        let updated = store
            .update(&[TodoId::new("nope")], &TodoPatch::completed(true))
            .unwrap();
        assert!(updated.is_empty());
    }

    #[test]
    fn delete_removes_listed_ids() {
        let mut store = LocalStore::new(MemoryStorage::new(), STORAGE_KEY);
        let a = store.insert("a").unwrap();
        let b = store.insert("b").unwrap();
        let c = store.insert("c").unwrap();
        store.delete(&[a.id.clone(), c.id.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![b]);
    }

    #[test]
    fn round_trip_through_directory_storage() {
        let dir = TempDir::new().unwrap();
        let mut store = LocalStore::new(DirStorage::new(dir.path()), STORAGE_KEY);
        store.load().unwrap();
        let a = store.insert("Buy milk").unwrap();
        let b = store.insert("Walk dog").unwrap();
        let mut b_done = store
            .update(&[b.id.clone()], &TodoPatch::completed(true))
            .unwrap();
        let expected = vec![b_done.remove(0), a];

        let mut reopened = LocalStore::new(DirStorage::new(dir.path()), STORAGE_KEY);
        assert_eq!(reopened.load().unwrap(), expected);
    }

    #[test]
    fn encoded_layout_uses_created_at_key() {
        let mut store = LocalStore::new(MemoryStorage::new(), STORAGE_KEY);
        store.insert("x").unwrap();
        let raw = store.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let entry = &value[0];
        assert!(entry["id"].is_string());
        assert_eq!(entry["text"], "x");
        assert_eq!(entry["completed"], false);
        assert!(entry["createdAt"].is_string());
    }

    #[test]
    fn failed_writes_leave_the_store_unchanged() {
        let (mut store, before) = read_only_with(&["Buy milk", "Walk dog"]);
        assert_eq!(store.load().unwrap(), before);

        assert!(matches!(
            store.insert("Call mom"),
            Err(StoreError::Storage { .. })
        ));
        assert!(matches!(
            store.update(&[TodoId::new("t0")], &TodoPatch::completed(true)),
            Err(StoreError::Storage { .. })
        ));
        assert!(matches!(
            store.delete(&[TodoId::new("t1")]),
            Err(StoreError::Storage { .. })
        ));

        assert_eq!(store.todos, before);
        assert_eq!(store.load().unwrap(), before);
    }

    #[test]
    fn failed_write_surfaces_as_failed_outcome() {
        let (store, before) = read_only_with(&["Buy milk"]);
        let mut list = TodoList::open(Box::new(store)).unwrap();

        let outcome = list.add("Call mom");
        let Outcome::Failed(notification) = &outcome else {
            panic!("expected a failed outcome, got {:?}", outcome);
        };
        assert!(notification.is_destructive());
        assert_eq!(notification.title, "Could not add todo");
        assert!(notification.description.contains("storage is read-only"));
        assert_eq!(list.todos(), &before[..]);

        assert!(list.toggle(&TodoId::new("t0")).is_failure());
        assert!(!list.todos()[0].completed);
    }
}
