//! Note service: per-board listing, creation with kind defaults, sparse
//! updates, and deletion.
//!
//! DESIGN
//! ======
//! Creation fills every absent field from the note kind (size, color) or from
//! the fixed placement defaults below. Updates carry only the fields a
//! gesture changed, so two clients touching different fields of one note do
//! not overwrite each other. Geometry must be finite; anything else is
//! rejected before the store is called.

#[cfg(test)]
#[path = "note_test.rs"]
mod note_test;

use canvas::consts::BASE_Z_INDEX;
use canvas::doc::{NoteHeight, NoteKind, NotePatch};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{self, NoteRecord, Store, StoreError};

const DEFAULT_X: f64 = 100.0;
const DEFAULT_Y: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Body of `POST /api/notes`. Everything but `boardId` is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteInput {
    #[serde(default)]
    pub board_id: String,
    #[serde(rename = "type")]
    pub kind: Option<NoteKind>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub width: Option<f64>,
    pub height: Option<NoteHeight>,
    pub x: Option<f64>,
    pub y: Option<f64>,
}

fn finite(values: impl IntoIterator<Item = Option<f64>>) -> Result<(), NoteError> {
    if values.into_iter().flatten().all(f64::is_finite) {
        Ok(())
    } else {
        Err(NoteError::Invalid("Note geometry must be finite."))
    }
}

fn fixed_height(height: Option<NoteHeight>) -> Option<f64> {
    match height {
        Some(NoteHeight::Fixed(h)) => Some(h),
        _ => None,
    }
}

/// Parse a board id from a header or body field.
///
/// # Errors
///
/// `Invalid` if `raw` is not a UUID.
pub fn parse_board_id(raw: &str) -> Result<Uuid, NoteError> {
    Uuid::parse_str(raw.trim()).map_err(|_| NoteError::Invalid("Invalid Board ID."))
}

/// Notes of a board in creation order.
///
/// # Errors
///
/// `Store` on persistence failure.
pub async fn list_notes(store: &dyn Store, board_id: Uuid) -> Result<Vec<NoteRecord>, NoteError> {
    Ok(store.list_notes(board_id).await?)
}

/// Create a note, applying defaults for every absent field.
///
/// # Errors
///
/// `Invalid` for a malformed board id or non-finite geometry.
pub async fn create_note(store: &dyn Store, input: CreateNoteInput) -> Result<NoteRecord, NoteError> {
    let board_id = parse_board_id(&input.board_id)?;
    finite([input.x, input.y, input.width, fixed_height(input.height)])?;

    let kind = input.kind.unwrap_or_default();
    let note = NoteRecord {
        id: Uuid::new_v4(),
        board_id,
        kind,
        content: input.content.unwrap_or_default(),
        color: input.color.unwrap_or_else(|| kind.default_color().to_owned()),
        width: input.width.unwrap_or_else(|| kind.default_width()),
        height: input.height.unwrap_or_else(|| kind.default_height()),
        x: input.x.unwrap_or(DEFAULT_X),
        y: input.y.unwrap_or(DEFAULT_Y),
        z_index: BASE_Z_INDEX,
        created_at: store::now(),
    };
    store.insert_note(&note).await?;
    info!(note_id = %note.id, board_id = %board_id, kind = ?kind, "note created");
    Ok(note)
}

/// Apply a sparse update. Missing notes and empty patches are no-ops.
///
/// # Errors
///
/// `Invalid` for non-finite geometry, `Store` on persistence failure.
pub async fn update_note(store: &dyn Store, id: Uuid, patch: &NotePatch) -> Result<(), NoteError> {
    finite([patch.x, patch.y, patch.width, fixed_height(patch.height)])?;
    if patch.is_empty() {
        return Ok(());
    }
    if !store.update_note(id, patch).await? {
        debug!(note_id = %id, "update for missing note ignored");
    }
    Ok(())
}

/// Delete a note. Deleting a missing note is a no-op.
///
/// # Errors
///
/// `Store` on persistence failure.
pub async fn delete_note(store: &dyn Store, id: Uuid) -> Result<(), NoteError> {
    if store.delete_note(id).await? {
        info!(note_id = %id, "note deleted");
    }
    Ok(())
}
