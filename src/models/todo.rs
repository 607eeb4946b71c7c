use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Subtask;

/// A dated to-do item inside a category.
///
/// A to-do owns zero or more subtasks. Marking a to-do done is independent
/// of its subtasks' done state — nothing forces all subtasks done first.
/// Deleting a to-do cascades to its subtasks but never touches the
/// completion ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub due_date: NaiveDate,
    pub done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new to-do. The due date is required by shape:
/// a submission without one fails before reaching the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodoInput {
    pub title: String,
    pub due_date: NaiveDate,
    pub category_id: Uuid,
}

/// Input for updating an existing to-do. All fields are optional for partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTodoInput {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    /// Move the to-do into a different category. Subtasks carry no category
    /// of their own, so the move does not alter them.
    pub category_id: Option<Uuid>,
}

/// A to-do with its subtasks in stored sibling order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodoWithSubtasks {
    #[serde(flatten)]
    pub todo: Todo,
    pub subtasks: Vec<Subtask>,
}
