use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::db::Database;
use crate::error::Error;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Translate a domain error into an HTTP response.
///
/// Validation errors come back as 422 with the field name so the caller
/// can re-show the form with the submitted values preserved. Anything
/// unclassified is logged server-side and sanitized to a generic 500.
fn error_response(e: Error) -> (StatusCode, String) {
    match &e {
        Error::Validation { field, message } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            serde_json::json!({ "field": field, "message": message }).to_string(),
        ),
        Error::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
        Error::Integrity(msg) => (StatusCode::CONFLICT, msg.clone()),
        Error::Database(_) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

fn not_found(what: &'static str) -> (StatusCode, String) {
    error_response(Error::NotFound(what))
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Categories
// ============================================================

pub async fn list_categories(
    State(db): State<Database>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    db.get_all_categories().map(Json).map_err(error_response)
}

pub async fn get_category(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryWithTodos>, (StatusCode, String)> {
    db.get_category_with_todos(id)
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| not_found("category"))
}

pub async fn create_category(
    State(db): State<Database>,
    Json(input): Json<CreateCategoryInput>,
) -> Result<(StatusCode, Json<Category>), (StatusCode, String)> {
    db.create_category(input)
        .map(|c| (StatusCode::CREATED, Json(c)))
        .map_err(error_response)
}

pub async fn rename_category(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<Category>, (StatusCode, String)> {
    db.rename_category(id, input)
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| not_found("category"))
}

// ============================================================
// Todos
// ============================================================

pub async fn list_todos(
    State(db): State<Database>,
) -> Result<Json<Vec<Todo>>, (StatusCode, String)> {
    db.get_all_todos().map(Json).map_err(error_response)
}

pub async fn get_todo(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Json<TodoWithSubtasks>, (StatusCode, String)> {
    db.get_todo_with_subtasks(id)
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| not_found("todo"))
}

pub async fn create_todo(
    State(db): State<Database>,
    Json(input): Json<CreateTodoInput>,
) -> Result<(StatusCode, Json<Todo>), (StatusCode, String)> {
    db.create_todo(input)
        .map(|t| (StatusCode::CREATED, Json(t)))
        .map_err(error_response)
}

pub async fn update_todo(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateTodoInput>,
) -> Result<Json<Todo>, (StatusCode, String)> {
    db.update_todo(id, input)
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| not_found("todo"))
}

/// Query parameters for deleting a to-do.
#[derive(Debug, Deserialize)]
pub struct DeleteTodoQuery {
    /// Must be true; the delete cascades to subtasks.
    #[serde(default)]
    pub confirm: bool,
}

pub async fn delete_todo(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteTodoQuery>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_todo(id, query.confirm).map_err(error_response)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("todo"))
    }
}

pub async fn mark_todo_done(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Completion>), (StatusCode, String)> {
    db.mark_done(CompletionKind::Todo, id)
        .map_err(error_response)?
        .map(|c| (StatusCode::CREATED, Json(c)))
        .ok_or_else(|| not_found("todo"))
}

// ============================================================
// Subtasks
// ============================================================

pub async fn create_subtask(
    State(db): State<Database>,
    Path(todo_id): Path<Uuid>,
    Json(input): Json<CreateSubtaskInput>,
) -> Result<(StatusCode, Json<Subtask>), (StatusCode, String)> {
    db.create_subtask(todo_id, input)
        .map(|s| (StatusCode::CREATED, Json(s)))
        .map_err(error_response)
}

pub async fn update_subtask(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateSubtaskInput>,
) -> Result<Json<Subtask>, (StatusCode, String)> {
    db.update_subtask(id, input)
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| not_found("subtask"))
}

pub async fn delete_subtask(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if db.delete_subtask(id).map_err(error_response)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found("subtask"))
    }
}

pub async fn move_subtask(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
    Json(input): Json<MoveSubtaskInput>,
) -> Result<Json<Subtask>, (StatusCode, String)> {
    db.move_subtask(id, input)
        .map_err(error_response)?
        .map(Json)
        .ok_or_else(|| not_found("subtask"))
}

pub async fn mark_subtask_done(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<Completion>), (StatusCode, String)> {
    db.mark_done(CompletionKind::Subtask, id)
        .map_err(error_response)?
        .map(|c| (StatusCode::CREATED, Json(c)))
        .ok_or_else(|| not_found("subtask"))
}

// ============================================================
// Completion ledger
// ============================================================

pub async fn list_completions(
    State(db): State<Database>,
) -> Result<Json<Vec<Completion>>, (StatusCode, String)> {
    db.get_all_completions().map(Json).map_err(error_response)
}

pub async fn delete_all_completions(
    State(db): State<Database>,
) -> Result<StatusCode, (StatusCode, String)> {
    db.delete_all_completions()
        .map(|_| StatusCode::NO_CONTENT)
        .map_err(error_response)
}
