use crate::model::TodoId;

/// One user intent. Each variant maps to exactly one list operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(TodoId),
    Edit(TodoId, String),
    Delete(TodoId),
    ClearCompleted,
    MarkAllComplete,
}
