use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::todos;
use crate::api::{NewTodo, Todo, TodoId, TodoPatch};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = todos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TodoRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Todo {
            id: TodoId(row.id),
            title: row.title,
            description: row.description,
            completed: row.completed,
            created_at: row.created_at,
        }
    }
}

// `id` and `created_at` come from column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = todos)]
pub struct NewTodoRow {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
}

impl From<&NewTodo> for NewTodoRow {
    fn from(new_todo: &NewTodo) -> Self {
        Self {
            title: new_todo.title.clone(),
            description: new_todo.description.clone(),
            completed: false,
        }
    }
}

// `None` fields are skipped by the generated SET clause; `Some(None)` on
// `description` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = todos)]
pub struct TodoChangeset {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

impl From<&TodoPatch> for TodoChangeset {
    fn from(patch: &TodoPatch) -> Self {
        Self {
            title: patch.title.clone(),
            description: patch.description.clone(),
            completed: patch.completed,
        }
    }
}
