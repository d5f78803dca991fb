//! In-memory `BoardApi` for outbox and desk tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use canvas::doc::{NoteHeight, NoteKind};
use uuid::Uuid;

use super::*;
use crate::outbox::Write;

#[derive(Default)]
pub struct MockApi {
    pub boards: Mutex<Vec<Board>>,
    pub notes: Mutex<Vec<Note>>,
    /// Writes that succeeded, in arrival order.
    pub applied: Mutex<Vec<Write>>,
    /// Every write attempt, including failed ones.
    pub attempts: AtomicU32,
    transient_failures: AtomicU32,
    reject_writes: AtomicBool,
}

impl MockApi {
    pub fn with_board(name: &str) -> (Self, BoardId) {
        let api = Self::default();
        let id = Uuid::new_v4();
        api.boards.lock().unwrap().push(Board { id, name: name.to_owned() });
        (api, id)
    }

    pub fn add_note(&self, board_id: BoardId, x: f64, y: f64) -> Note {
        let note = Note {
            id: Uuid::new_v4(),
            board_id,
            kind: NoteKind::Text,
            content: String::new(),
            color: "#FEF3C7".into(),
            width: 250.0,
            height: NoteHeight::Fixed(200.0),
            x,
            y,
            z_index: 1,
        };
        self.notes.lock().unwrap().push(note.clone());
        note
    }

    /// Fail the next `n` write attempts with a 503.
    pub fn fail_next(&self, n: u32) {
        self.transient_failures.store(n, Ordering::SeqCst);
    }

    /// Reject every write with a 400 until turned off.
    pub fn reject_writes(&self, on: bool) {
        self.reject_writes.store(on, Ordering::SeqCst);
    }

    pub fn stored_note(&self, id: NoteId) -> Option<Note> {
        self.notes.lock().unwrap().iter().find(|n| n.id == id).cloned()
    }

    fn gate(&self) -> Result<(), ApiError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Server { status: 400, message: "rejected".into() });
        }
        let pending = self.transient_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.transient_failures.store(pending - 1, Ordering::SeqCst);
            return Err(ApiError::Server { status: 503, message: "unavailable".into() });
        }
        Ok(())
    }
}

#[async_trait]
impl BoardApi for MockApi {
    async fn list_boards(&self, _user_email: &str) -> Result<Vec<Board>, ApiError> {
        Ok(self.boards.lock().unwrap().clone())
    }

    async fn create_board(&self, _user_email: &str, name: &str) -> Result<Board, ApiError> {
        let board = Board { id: Uuid::new_v4(), name: name.to_owned() };
        self.boards.lock().unwrap().push(board.clone());
        Ok(board)
    }

    async fn delete_board(&self, id: BoardId) -> Result<(), ApiError> {
        self.gate()?;
        self.boards.lock().unwrap().retain(|b| b.id != id);
        self.notes.lock().unwrap().retain(|n| n.board_id != id);
        self.applied.lock().unwrap().push(Write::DeleteBoard { id });
        Ok(())
    }

    async fn fetch_notes(&self, board_id: BoardId) -> Result<Vec<Note>, ApiError> {
        Ok(self.notes.lock().unwrap().iter().filter(|n| n.board_id == board_id).cloned().collect())
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let note = Note {
            id: Uuid::new_v4(),
            board_id: draft.board_id,
            kind: draft.kind,
            content: draft.content.clone(),
            color: draft.color.clone(),
            width: draft.width,
            height: draft.height,
            x: draft.x,
            y: draft.y,
            z_index: 1,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: NoteId, fields: &NotePatch) -> Result<(), ApiError> {
        self.gate()?;
        if let Some(note) = self.notes.lock().unwrap().iter_mut().find(|n| n.id == id) {
            if let Some(x) = fields.x {
                note.x = x;
            }
            if let Some(y) = fields.y {
                note.y = y;
            }
            if let Some(w) = fields.width {
                note.width = w;
            }
            if let Some(h) = fields.height {
                note.height = h;
            }
            if let Some(z) = fields.z_index {
                note.z_index = z;
            }
            if let Some(content) = &fields.content {
                note.content.clone_from(content);
            }
            if let Some(color) = &fields.color {
                note.color.clone_from(color);
            }
        }
        self.applied.lock().unwrap().push(Write::UpdateNote { id, fields: fields.clone() });
        Ok(())
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), ApiError> {
        self.gate()?;
        self.notes.lock().unwrap().retain(|n| n.id != id);
        self.applied.lock().unwrap().push(Write::DeleteNote { id });
        Ok(())
    }
}
