use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Todo;

/// A named bucket of to-dos.
///
/// Categories are the top-level organizational unit and are permanent:
/// the UI exposes rename but never delete, which is what lets every to-do
/// assume its category still exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

/// Input for renaming a category. Rename is the only mutation categories support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    pub name: String,
}

/// A category with its to-dos, used for detailed responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithTodos {
    #[serde(flatten)]
    pub category: Category,
    pub todos: Vec<Todo>,
}
