//! Public API surface for the todo backend.
//!
//! Domain types shared by the repository layer and the HTTP layer.
//! All types derive Serialize/Deserialize for JSON serialization.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Todo identifier (database primary key).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TodoId(pub i64);

impl TodoId {
    pub fn new(value: i64) -> Self {
        TodoId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(TodoId)
    }
}

/// A persisted todo.
///
/// `id` and `created_at` are assigned by the store on insert and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Values for a todo that has not been stored yet.
///
/// `completed` always starts as false; there is no way to create a todo that
/// is already done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of a todo.
///
/// Each `None` leaves the stored value untouched. `description` is doubly
/// optional: `Some(None)` clears it, `None` leaves it as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// True when the patch carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Apply the present fields to `todo` in place.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(ref title) = self.title {
            todo.title = title.clone();
        }
        if let Some(ref description) = self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

// A field that is present in the payload always lands in `Some`, even when its
// value is `null`; `#[serde(default)]` covers the absent case.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
