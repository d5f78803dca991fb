//! To-do routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::json;

use crate::routes::reply::{ApiFailure, ApiResult, UserEmail, body, parse_id, success, todo_failure};
use crate::services::todo::{self, CreateTaskInput, ReorderInput};
use crate::state::AppState;
use crate::store::{TaskChanges, TaskRecord};

const INVALID_TASK_ID: &str = "Invalid Task ID.";

/// `GET /api/todos`
pub async fn list_tasks(
    State(state): State<AppState>,
    UserEmail(email): UserEmail,
) -> Result<Json<Vec<TaskRecord>>, ApiFailure> {
    let tasks = todo::list_tasks(state.store.as_ref(), &email).await.map_err(todo_failure)?;
    Ok(Json(tasks))
}

/// `POST /api/todos`
pub async fn create_task(State(state): State<AppState>, payload: Result<Json<CreateTaskInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    let task = todo::create_task(state.store.as_ref(), input).await.map_err(todo_failure)?;
    Ok(success(json!({ "task": task })))
}

/// `PUT /api/todos/:id`: `{isCompleted?, content?}`.
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: Result<Json<TaskChanges>, JsonRejection>,
) -> ApiResult {
    let id = parse_id(&raw, INVALID_TASK_ID)?;
    let changes = body(payload)?;
    todo::update_task(state.store.as_ref(), id, changes).await.map_err(todo_failure)?;
    Ok(success(json!({})))
}

/// `PUT /api/todos/reorder`: `{taskIds: [...]}` in display order.
pub async fn reorder_tasks(State(state): State<AppState>, payload: Result<Json<ReorderInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    todo::reorder_tasks(state.store.as_ref(), input).await.map_err(todo_failure)?;
    Ok(success(json!({})))
}

/// `DELETE /api/todos/:id`
pub async fn delete_task(State(state): State<AppState>, Path(raw): Path<String>) -> ApiResult {
    let id = parse_id(&raw, INVALID_TASK_ID)?;
    todo::delete_task(state.store.as_ref(), id).await.map_err(todo_failure)?;
    Ok(success(json!({})))
}
