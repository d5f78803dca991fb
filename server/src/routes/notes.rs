//! Note routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use canvas::doc::NotePatch;
use serde_json::json;

use crate::routes::reply::{ApiFailure, ApiResult, BoardHeader, body, note_failure, parse_id, success};
use crate::services::note::{self, CreateNoteInput};
use crate::state::AppState;
use crate::store::NoteRecord;

const INVALID_NOTE_ID: &str = "Invalid Note ID.";

/// `GET /api/notes`: notes of the board named by the `board-id` header.
pub async fn list_notes(
    State(state): State<AppState>,
    BoardHeader(board_id): BoardHeader,
) -> Result<Json<Vec<NoteRecord>>, ApiFailure> {
    let notes = note::list_notes(state.store.as_ref(), board_id).await.map_err(note_failure)?;
    Ok(Json(notes))
}

/// `POST /api/notes`
pub async fn create_note(State(state): State<AppState>, payload: Result<Json<CreateNoteInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    let note = note::create_note(state.store.as_ref(), input).await.map_err(note_failure)?;
    Ok(success(json!({ "note": note })))
}

/// `PUT /api/notes/:id`: sparse update.
pub async fn update_note(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    payload: Result<Json<NotePatch>, JsonRejection>,
) -> ApiResult {
    let id = parse_id(&raw, INVALID_NOTE_ID)?;
    let patch = body(payload)?;
    note::update_note(state.store.as_ref(), id, &patch).await.map_err(note_failure)?;
    Ok(success(json!({})))
}

/// `DELETE /api/notes/:id`
pub async fn delete_note(State(state): State<AppState>, Path(raw): Path<String>) -> ApiResult {
    let id = parse_id(&raw, INVALID_NOTE_ID)?;
    note::delete_note(state.store.as_ref(), id).await.map_err(note_failure)?;
    Ok(success(json!({})))
}
