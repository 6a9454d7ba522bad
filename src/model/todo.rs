use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque todo identifier.
///
/// Local todos use a random UUID; remote todos use whatever primary key the
/// server hands back (numeric keys are kept in their decimal string form).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        TodoId(id.into())
    }

    /// A fresh random id for a locally created todo
    pub fn generate() -> Self {
        TodoId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters shown in listings (full id when shorter)
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((i, _)) => &self.0[..i],
            None => &self.0,
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self {
        TodoId(s.to_string())
    }
}

/// A single task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Set once at creation
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// A new, active todo created now. `text` must already be normalized.
    pub fn new(id: TodoId, text: String) -> Self {
        Todo {
            id,
            text,
            completed: false,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update. `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: &TodoPatch) {
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(ref text) = patch.text {
            self.text = text.clone();
        }
    }
}

/// Partial update sent to a store. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        TodoPatch {
            completed: Some(completed),
            text: None,
        }
    }

    pub fn text(text: String) -> Self {
        TodoPatch {
            completed: None,
            text: Some(text),
        }
    }
}

/// Trim user input; `None` when nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// View predicate over the collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    #[default]
    All,
    Active,
    Completed,
}

impl FilterType {
    pub const ALL: [FilterType; 3] = [FilterType::All, FilterType::Active, FilterType::Completed];

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            FilterType::All => true,
            FilterType::Active => !todo.completed,
            FilterType::Completed => todo.completed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterType::All => "All",
            FilterType::Active => "Active",
            FilterType::Completed => "Completed",
        }
    }

    /// Cycle all → active → completed → all
    pub fn next(self) -> Self {
        match self {
            FilterType::All => FilterType::Active,
            FilterType::Active => FilterType::Completed,
            FilterType::Completed => FilterType::All,
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterType::All => "all",
            FilterType::Active => "active",
            FilterType::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A filter name that is not one of all, active, completed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter '{0}' (expected: all, active, completed)")]
pub struct ParseFilterError(pub String);

impl FromStr for FilterType {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(FilterType::All),
            "active" => Ok(FilterType::Active),
            "completed" => Ok(FilterType::Completed),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
