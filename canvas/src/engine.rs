//! Board session: the explicit state object a host drives.
//!
//! DESIGN
//! ======
//! `BoardSession` owns the board list, the active board's phase, its notes,
//! the viewport, the in-flight gesture, and the set of notes whose last write
//! failed. Every operation mutates local state synchronously and returns the
//! [`Action`]s the host must perform (fetch, create, update, delete, redraw).
//! The session never waits for the host: optimistic state stays in place even
//! if the write later fails, and the host reports that back through
//! [`BoardSession::mark_unsynced`].
//!
//! PHASES
//! ======
//! `NoBoard -> Loading -> Ready`, and `Ready -> Loading` on every switch. A
//! notes fetch completes only for the board currently loading, so a slow
//! response for a board the user already left is dropped.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::collections::HashSet;

use crate::camera::{Camera, Point};
use crate::consts::{FALLBACK_VIEWPORT_HEIGHT, FALLBACK_VIEWPORT_WIDTH, ZOOM_STEP};
use crate::doc::{Board, BoardId, Note, NoteDraft, NoteId, NoteKind, NotePatch, NoteStore};
use crate::hit::{Target, hit_test};
use crate::input::InputState;

/// Work the host must perform on behalf of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Fetch the notes of a board and report them with `notes_loaded`.
    FetchNotes { board_id: BoardId },
    /// Persist a new note and report the stored record with `note_created`.
    CreateNote(NoteDraft),
    /// Persist the listed fields of a note.
    UpdateNote { id: NoteId, fields: NotePatch },
    DeleteNote { id: NoteId },
    DeleteBoard { id: BoardId },
    /// Local state changed; redraw.
    RenderNeeded,
}

/// Lifecycle of the active board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    NoBoard,
    Loading {
        board_id: BoardId,
    },
    Ready {
        board_id: BoardId,
    },
}

impl SessionPhase {
    /// The board being loaded or shown, if any.
    #[must_use]
    pub fn board_id(self) -> Option<BoardId> {
        match self {
            Self::NoBoard => None,
            Self::Loading { board_id } | Self::Ready { board_id } => Some(board_id),
        }
    }
}

/// State of one user's board workspace.
#[derive(Debug, Clone, Default)]
pub struct BoardSession {
    boards: Vec<Board>,
    phase: SessionPhase,
    notes: NoteStore,
    camera: Camera,
    input: InputState,
    editing: Option<NoteId>,
    /// Host-reported canvas size in CSS pixels; zero until reported.
    viewport_width: f64,
    viewport_height: f64,
    unsynced: HashSet<NoteId>,
}

impl BoardSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Boards ---

    /// Replace the board list. Activates the first board when no listed board is active.
    pub fn load_boards(&mut self, boards: Vec<Board>) -> Vec<Action> {
        self.boards = boards;
        let active_listed = self
            .phase
            .board_id()
            .is_some_and(|id| self.boards.iter().any(|b| b.id == id));
        if active_listed {
            return vec![Action::RenderNeeded];
        }
        match self.boards.first().map(|b| b.id) {
            Some(first) => self.activate(first),
            None => self.deactivate(),
        }
    }

    /// Switch to `board_id`: clear the notes, reset the viewport, and request a fetch.
    ///
    /// Unknown boards are ignored. Re-activating the current board reloads it.
    pub fn activate(&mut self, board_id: BoardId) -> Vec<Action> {
        if !self.boards.iter().any(|b| b.id == board_id) {
            return Vec::new();
        }
        self.reset_board_state();
        self.phase = SessionPhase::Loading { board_id };
        vec![Action::FetchNotes { board_id }, Action::RenderNeeded]
    }

    /// Complete a fetch. Results for any board other than the loading one are discarded.
    pub fn notes_loaded(&mut self, board_id: BoardId, notes: Vec<Note>) -> Vec<Action> {
        if self.phase != (SessionPhase::Loading { board_id }) {
            return Vec::new();
        }
        self.notes.load_snapshot(notes);
        self.camera.reset();
        self.phase = SessionPhase::Ready { board_id };
        vec![Action::RenderNeeded]
    }

    /// Append a board the server just created and switch to it.
    pub fn board_created(&mut self, board: Board) -> Vec<Action> {
        let id = board.id;
        if !self.boards.iter().any(|b| b.id == id) {
            self.boards.push(board);
        }
        self.activate(id)
    }

    /// Remove a board locally and request its deletion. Deleting the active
    /// board falls back to the first remaining board.
    pub fn delete_board(&mut self, board_id: BoardId) -> Vec<Action> {
        let Some(idx) = self.boards.iter().position(|b| b.id == board_id) else {
            return Vec::new();
        };
        self.boards.remove(idx);
        let mut actions = vec![Action::DeleteBoard { id: board_id }];
        if self.phase.board_id() == Some(board_id) {
            match self.boards.first().map(|b| b.id) {
                Some(next) => actions.extend(self.activate(next)),
                None => actions.extend(self.deactivate()),
            }
        } else {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn deactivate(&mut self) -> Vec<Action> {
        self.reset_board_state();
        self.phase = SessionPhase::NoBoard;
        vec![Action::RenderNeeded]
    }

    fn reset_board_state(&mut self) {
        self.notes.clear();
        self.camera.reset();
        self.input = InputState::Idle;
        self.editing = None;
        self.unsynced.clear();
    }

    // --- Notes ---

    /// Request a new note of `kind` centered in the visible canvas.
    ///
    /// The note only joins the collection once `note_created` confirms it.
    pub fn create_note(&mut self, kind: NoteKind, content: impl Into<String>) -> Vec<Action> {
        let Some(board_id) = self.phase.board_id() else {
            return Vec::new();
        };
        let width = kind.default_width();
        let height = kind.default_height();
        let center = self.camera.screen_to_world(self.viewport_center());
        vec![Action::CreateNote(NoteDraft {
            board_id,
            kind,
            content: content.into(),
            color: kind.default_color().to_owned(),
            width,
            height,
            x: center.x - width / 2.0,
            y: center.y - height.extent() / 2.0,
        })]
    }

    /// Add a note the server confirmed. Ignored if the user switched boards meanwhile.
    pub fn note_created(&mut self, note: Note) -> Vec<Action> {
        if self.phase.board_id() != Some(note.board_id) {
            return Vec::new();
        }
        self.notes.insert(note);
        vec![Action::RenderNeeded]
    }

    /// Remove a note locally and request its deletion.
    pub fn delete_note(&mut self, id: NoteId) -> Vec<Action> {
        if self.notes.remove(&id).is_none() {
            return Vec::new();
        }
        self.unsynced.remove(&id);
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.input.active_note() == Some(id) {
            self.input = InputState::Idle;
        }
        vec![Action::DeleteNote { id }, Action::RenderNeeded]
    }

    /// Recolor a text note. Other note kinds have no visible color and are left alone.
    pub fn set_color(&mut self, id: NoteId, color: impl Into<String>) -> Vec<Action> {
        if !self.notes.get(&id).is_some_and(|n| n.kind.has_color()) {
            return Vec::new();
        }
        let fields = NotePatch { color: Some(color.into()), ..NotePatch::default() };
        self.persist(id, fields)
    }

    fn persist(&mut self, id: NoteId, fields: NotePatch) -> Vec<Action> {
        self.notes.apply_patch(&id, &fields);
        vec![Action::UpdateNote { id, fields }, Action::RenderNeeded]
    }

    // --- Pointer input ---

    /// Pointer-down on a target the host already resolved.
    ///
    /// Ignored while another gesture is active.
    pub fn on_pointer_down(&mut self, screen: Point, target: Target) -> Vec<Action> {
        if !self.input.is_idle() {
            return Vec::new();
        }
        self.input = InputState::begin(target, screen, &self.camera, &mut self.notes);
        if self.input.is_idle() { Vec::new() } else { vec![Action::RenderNeeded] }
    }

    /// Pointer-down resolved geometrically against the current notes.
    pub fn on_pointer_down_at(&mut self, screen: Point) -> Vec<Action> {
        let target = hit_test(screen, &self.notes, &self.camera);
        self.on_pointer_down(screen, target)
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if self.input.update(screen, &mut self.camera, &mut self.notes) {
            vec![Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    /// Pointer-up always commits the active gesture. Note gestures emit
    /// exactly one `UpdateNote`.
    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        if state.is_idle() {
            return Vec::new();
        }
        match state.commit(screen, &mut self.camera, &mut self.notes) {
            Some((id, fields)) => vec![Action::UpdateNote { id, fields }, Action::RenderNeeded],
            None => vec![Action::RenderNeeded],
        }
    }

    // --- Zoom ---

    pub fn adjust_zoom(&mut self, delta: f64) -> Vec<Action> {
        self.camera.adjust_zoom(delta);
        vec![Action::RenderNeeded]
    }

    pub fn zoom_in(&mut self) -> Vec<Action> {
        self.adjust_zoom(ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> Vec<Action> {
        self.adjust_zoom(-ZOOM_STEP)
    }

    // --- Text editing ---

    /// Focus a text or plain-text note for editing. Returns false for image or unknown notes.
    pub fn begin_text_edit(&mut self, id: NoteId) -> bool {
        if !self.notes.get(&id).is_some_and(|n| n.kind.is_textual()) {
            return false;
        }
        self.editing = Some(id);
        true
    }

    /// Blur: store the edited text and persist it. Commits even if the text is unchanged.
    pub fn commit_text(&mut self, id: NoteId, content: impl Into<String>) -> Vec<Action> {
        if self.editing == Some(id) {
            self.editing = None;
        }
        if self.notes.get(&id).is_none() {
            return Vec::new();
        }
        let fields = NotePatch { content: Some(content.into()), ..NotePatch::default() };
        self.persist(id, fields)
    }

    // --- Viewport ---

    /// Record the canvas size in CSS pixels. Non-positive sizes fall back to the default.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    fn viewport_center(&self) -> Point {
        let w = if self.viewport_width > 0.0 { self.viewport_width } else { FALLBACK_VIEWPORT_WIDTH };
        let h = if self.viewport_height > 0.0 { self.viewport_height } else { FALLBACK_VIEWPORT_HEIGHT };
        Point::new(w / 2.0, h / 2.0)
    }

    // --- Sync state ---

    /// Flag a note whose write failed after every retry.
    pub fn mark_unsynced(&mut self, id: NoteId) {
        if self.notes.get(&id).is_some() {
            self.unsynced.insert(id);
        }
    }

    /// Clear the flag after a later write of the note succeeded.
    pub fn mark_synced(&mut self, id: NoteId) {
        self.unsynced.remove(&id);
    }

    #[must_use]
    pub fn is_unsynced(&self, id: &NoteId) -> bool {
        self.unsynced.contains(id)
    }

    #[must_use]
    pub fn unsynced_count(&self) -> usize {
        self.unsynced.len()
    }

    // --- Queries ---

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn active_board(&self) -> Option<BoardId> {
        self.phase.board_id()
    }

    #[must_use]
    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    #[must_use]
    pub fn notes(&self) -> &NoteStore {
        &self.notes
    }

    #[must_use]
    pub fn note(&self, id: &NoteId) -> Option<&Note> {
        self.notes.get(id)
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn input(&self) -> InputState {
        self.input
    }

    #[must_use]
    pub fn editing(&self) -> Option<NoteId> {
        self.editing
    }
}
