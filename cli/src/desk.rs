//! Desk: a `BoardSession` wired to the API and the outbox.
//!
//! DESIGN
//! ======
//! The session decides; the desk performs. Every session call returns a list
//! of actions, and `Desk::run` works through them in order. Reads and creates
//! (`FetchNotes`, `CreateNote`) are awaited because the session needs their
//! results. Writes go to the outbox and return immediately, so the local
//! state a gesture produced is visible before the server has seen it. Sync
//! events coming back from the outbox become unsynced flags on the session.

#[cfg(test)]
#[path = "desk_test.rs"]
mod desk_test;

use std::collections::VecDeque;
use std::sync::Arc;

use canvas::camera::Point;
use canvas::doc::{BoardId, NoteId, NoteKind};
use canvas::engine::{Action, BoardSession};
use canvas::hit::Target;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, BoardApi};
use crate::outbox::{DEFAULT_QUEUE_CAPACITY, Outbox, OutboxClosed, RetryConfig, SyncEvent, Write, WriteTarget};

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Outbox(#[from] OutboxClosed),
}

pub struct Desk {
    session: BoardSession,
    api: Arc<dyn BoardApi>,
    outbox: Outbox,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    user_email: String,
    last_created: Option<NoteId>,
    renders: u64,
}

impl Desk {
    /// Start the outbox, load the user's boards, and open the first one.
    ///
    /// # Errors
    ///
    /// Fails if the board list or the first board's notes cannot be fetched.
    pub async fn open(api: Arc<dyn BoardApi>, user_email: &str, retry: RetryConfig) -> Result<Self, DeskError> {
        let (outbox, events) = Outbox::spawn(api.clone(), retry, DEFAULT_QUEUE_CAPACITY);
        let mut desk = Self {
            session: BoardSession::new(),
            api,
            outbox,
            events,
            user_email: user_email.to_owned(),
            last_created: None,
            renders: 0,
        };
        let boards = desk.api.list_boards(&desk.user_email).await?;
        info!(count = boards.len(), "boards loaded");
        let actions = desk.session.load_boards(boards);
        desk.run(actions).await?;
        Ok(desk)
    }

    #[must_use]
    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    /// Number of redraws the session has requested.
    #[must_use]
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Perform session actions until none are left.
    ///
    /// # Errors
    ///
    /// Stops at the first failed fetch or create; queued writes are unaffected.
    pub async fn run(&mut self, actions: Vec<Action>) -> Result<(), DeskError> {
        let mut pending = VecDeque::from(actions);
        while let Some(action) = pending.pop_front() {
            match action {
                Action::FetchNotes { board_id } => {
                    let notes = self.api.fetch_notes(board_id).await?;
                    debug!(%board_id, count = notes.len(), "notes fetched");
                    pending.extend(self.session.notes_loaded(board_id, notes));
                }
                Action::CreateNote(draft) => {
                    let note = self.api.create_note(&draft).await?;
                    self.last_created = Some(note.id);
                    pending.extend(self.session.note_created(note));
                }
                Action::UpdateNote { id, fields } => self.outbox.enqueue(Write::UpdateNote { id, fields }).await?,
                Action::DeleteNote { id } => self.outbox.enqueue(Write::DeleteNote { id }).await?,
                Action::DeleteBoard { id } => self.outbox.enqueue(Write::DeleteBoard { id }).await?,
                Action::RenderNeeded => self.renders += 1,
            }
        }
        self.apply_sync_events();
        Ok(())
    }

    /// Fold finished writes into the session's unsynced flags. Returns how
    /// many events were applied.
    pub fn apply_sync_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            applied += 1;
            match event {
                SyncEvent::Synced(WriteTarget::Note(id)) => self.session.mark_synced(id),
                SyncEvent::Failed { target: WriteTarget::Note(id), error } => {
                    warn!(note_id = %id, %error, "note left unsynced");
                    self.session.mark_unsynced(id);
                }
                SyncEvent::Synced(WriteTarget::Board(_)) => {}
                SyncEvent::Failed { target: WriteTarget::Board(id), error } => {
                    warn!(board_id = %id, %error, "board delete did not reach the server");
                }
            }
        }
        applied
    }

    /// Wait for every queued write, then apply the results.
    ///
    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn settle(&mut self) -> Result<(), DeskError> {
        self.outbox.flush().await?;
        self.apply_sync_events();
        Ok(())
    }

    /// Stop the outbox after it drains.
    pub async fn close(self) {
        self.outbox.shutdown().await;
    }

    // =========================================================================
    // BOARDS
    // =========================================================================

    /// # Errors
    ///
    /// Fails if the notes of the board cannot be fetched.
    pub async fn switch_board(&mut self, id: BoardId) -> Result<(), DeskError> {
        let actions = self.session.activate(id);
        self.run(actions).await
    }

    /// # Errors
    ///
    /// Fails if the server rejects the board.
    pub async fn create_board(&mut self, name: &str) -> Result<BoardId, DeskError> {
        let board = self.api.create_board(&self.user_email, name).await?;
        let id = board.id;
        let actions = self.session.board_created(board);
        self.run(actions).await?;
        Ok(id)
    }

    /// # Errors
    ///
    /// Fails if the next board's notes cannot be fetched.
    pub async fn delete_board(&mut self, id: BoardId) -> Result<(), DeskError> {
        let actions = self.session.delete_board(id);
        self.run(actions).await
    }

    // =========================================================================
    // NOTES
    // =========================================================================

    /// Create a note in the middle of the viewport. Returns its id once the
    /// server has stored it, or `None` if no board is open.
    ///
    /// # Errors
    ///
    /// Fails if the server rejects the note.
    pub async fn create_note(&mut self, kind: NoteKind, content: &str) -> Result<Option<NoteId>, DeskError> {
        self.last_created = None;
        let actions = self.session.create_note(kind, content);
        self.run(actions).await?;
        Ok(self.last_created.take())
    }

    /// Focus a note, replace its text, and blur. Returns false for notes
    /// without editable text.
    ///
    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn edit_text(&mut self, id: NoteId, content: &str) -> Result<bool, DeskError> {
        if !self.session.begin_text_edit(id) {
            return Ok(false);
        }
        let actions = self.session.commit_text(id, content);
        self.run(actions).await?;
        Ok(true)
    }

    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn set_color(&mut self, id: NoteId, color: &str) -> Result<(), DeskError> {
        let actions = self.session.set_color(id, color);
        self.run(actions).await
    }

    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn delete_note(&mut self, id: NoteId) -> Result<(), DeskError> {
        let actions = self.session.delete_note(id);
        self.run(actions).await
    }

    // =========================================================================
    // GESTURES
    // =========================================================================

    /// Drag a note by its header from `from` to `to` (screen coordinates).
    ///
    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn drag(&mut self, id: NoteId, from: Point, to: Point) -> Result<(), DeskError> {
        self.gesture(Target::NoteBody(id), from, to).await
    }

    /// Drag a note's resize handle from `from` to `to`.
    ///
    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn resize(&mut self, id: NoteId, from: Point, to: Point) -> Result<(), DeskError> {
        self.gesture(Target::ResizeHandle(id), from, to).await
    }

    /// Pan the canvas.
    ///
    /// # Errors
    ///
    /// `Outbox` if the worker has stopped.
    pub async fn pan(&mut self, from: Point, to: Point) -> Result<(), DeskError> {
        self.gesture(Target::Background, from, to).await
    }

    /// Change zoom by `delta`, clamped to the allowed range.
    pub fn zoom(&mut self, delta: f64) {
        for action in self.session.adjust_zoom(delta) {
            if action == Action::RenderNeeded {
                self.renders += 1;
            }
        }
    }

    async fn gesture(&mut self, target: Target, from: Point, to: Point) -> Result<(), DeskError> {
        let mut actions = self.session.on_pointer_down(from, target);
        actions.extend(self.session.on_pointer_move(to));
        actions.extend(self.session.on_pointer_up(to));
        self.run(actions).await
    }
}
