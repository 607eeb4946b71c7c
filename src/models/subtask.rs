use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A step belonging to exactly one to-do.
///
/// Subtasks keep their own due date, independent of the parent's, and an
/// explicit `position` among siblings. New subtasks append after all
/// existing ones; the domain layer renumbers on delete and reorder so
/// positions stay dense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Uuid,
    pub todo_id: Uuid,
    pub title: String,
    pub due_date: NaiveDate,
    /// Zero-based index among siblings of the same to-do.
    pub position: i64,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new subtask. It is always appended at the end of
/// the sibling order; use a reorder to move it afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubtaskInput {
    pub title: String,
    pub due_date: NaiveDate,
}

/// Input for updating an existing subtask. All fields are optional for partial updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubtaskInput {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Input for moving a subtask within its sibling order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveSubtaskInput {
    /// Target zero-based index. Values past the end clamp to last place.
    pub position: i64,
}
