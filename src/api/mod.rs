mod handlers;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let api = Router::new()
        // Categories (rename only; no delete route exists)
        .route("/categories", get(handlers::list_categories))
        .route("/categories", post(handlers::create_category))
        .route("/categories/{id}", get(handlers::get_category))
        .route("/categories/{id}", put(handlers::rename_category))
        // Todos
        .route("/todos", get(handlers::list_todos))
        .route("/todos", post(handlers::create_todo))
        .route("/todos/{id}", get(handlers::get_todo))
        .route("/todos/{id}", put(handlers::update_todo))
        .route("/todos/{id}", delete(handlers::delete_todo))
        .route("/todos/{id}/done", post(handlers::mark_todo_done))
        .route("/todos/{id}/subtasks", post(handlers::create_subtask))
        // Subtasks
        .route("/subtasks/{id}", put(handlers::update_subtask))
        .route("/subtasks/{id}", delete(handlers::delete_subtask))
        .route("/subtasks/{id}/position", put(handlers::move_subtask))
        .route("/subtasks/{id}/done", post(handlers::mark_subtask_done))
        // Completion ledger (append-only; delete clears the whole thing)
        .route("/completions", get(handlers::list_completions))
        .route("/completions", delete(handlers::delete_all_completions))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
