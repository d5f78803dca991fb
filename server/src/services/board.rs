//! Board service: listing with a lazily created default, creation, and
//! cascading deletion.

#[cfg(test)]
#[path = "board_test.rs"]
mod board_test;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::store::{self, BoardRecord, Store, StoreError};

/// Name given to the first board of a user and to boards created without a name.
pub const DEFAULT_BOARD_NAME: &str = "My Board";

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardInput {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub name: String,
}

fn owner(email: &str) -> Result<String, BoardError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(BoardError::Invalid("User email is required."));
    }
    Ok(email)
}

/// List a user's boards, creating the default board if they have none.
///
/// # Errors
///
/// `Invalid` for a blank email, `Store` on persistence failure.
pub async fn list_boards(store: &dyn Store, email: &str) -> Result<Vec<BoardRecord>, BoardError> {
    let email = owner(email)?;
    let existing = store.list_boards(&email).await?;
    if !existing.is_empty() {
        return Ok(existing);
    }
    let candidate = BoardRecord {
        id: Uuid::new_v4(),
        user_email: email,
        name: DEFAULT_BOARD_NAME.to_owned(),
        created_at: store::now(),
    };
    let boards = store.ensure_board(&candidate).await?;
    if boards.iter().any(|b| b.id == candidate.id) {
        info!(board_id = %candidate.id, email = %candidate.user_email, "created default board");
    }
    Ok(boards)
}

/// Create a board. A blank name falls back to the default name.
///
/// # Errors
///
/// `Invalid` for a blank email, `Store` on persistence failure.
pub async fn create_board(store: &dyn Store, input: CreateBoardInput) -> Result<BoardRecord, BoardError> {
    let user_email = owner(&input.user_email)?;
    let name = match input.name.trim() {
        "" => DEFAULT_BOARD_NAME.to_owned(),
        name => name.to_owned(),
    };
    let board = BoardRecord { id: Uuid::new_v4(), user_email, name, created_at: store::now() };
    store.insert_board(&board).await?;
    info!(board_id = %board.id, "board created");
    Ok(board)
}

/// Delete a board and all of its notes. Deleting a missing board is a no-op.
///
/// # Errors
///
/// `Store` on persistence failure; nothing is deleted in that case.
pub async fn delete_board(store: &dyn Store, id: Uuid) -> Result<(), BoardError> {
    if store.delete_board_cascade(id).await? {
        info!(board_id = %id, "board deleted");
    }
    Ok(())
}
