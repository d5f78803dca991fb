//! Board routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde_json::json;

use crate::routes::reply::{ApiFailure, ApiResult, UserEmail, board_failure, body, parse_id, success};
use crate::services::board::{self, CreateBoardInput};
use crate::state::AppState;
use crate::store::BoardRecord;

/// `GET /api/boards`: the caller's boards; creates the default board on first use.
pub async fn list_boards(
    State(state): State<AppState>,
    UserEmail(email): UserEmail,
) -> Result<Json<Vec<BoardRecord>>, ApiFailure> {
    let boards = board::list_boards(state.store.as_ref(), &email).await.map_err(board_failure)?;
    Ok(Json(boards))
}

/// `POST /api/boards`
pub async fn create_board(
    State(state): State<AppState>,
    payload: Result<Json<CreateBoardInput>, JsonRejection>,
) -> ApiResult {
    let input = body(payload)?;
    let board = board::create_board(state.store.as_ref(), input).await.map_err(board_failure)?;
    Ok(success(json!({ "board": board })))
}

/// `DELETE /api/boards/:id`: removes the board and all of its notes.
pub async fn delete_board(State(state): State<AppState>, Path(raw): Path<String>) -> ApiResult {
    let id = parse_id(&raw, "Invalid Board ID.")?;
    board::delete_board(state.store.as_ref(), id).await.map_err(board_failure)?;
    Ok(success(json!({})))
}
