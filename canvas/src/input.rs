//! Gesture state machine: pan, note drag, and note resize.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Each active variant carries the pointer's start position and
//! the values it started from, so every pointer-move recomputes the result
//! from the origin instead of accumulating per-event deltas.
//!
//! Lifecycle: `begin` (pointer-down) picks the gesture from the hit
//! [`Target`], `update` (pointer-move) mutates the viewport or note store
//! optimistically, and the consuming `commit` (pointer-up) applies the final
//! position and yields the one persisted patch for the gesture. There is no
//! cancel path.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::{Camera, Point};
use crate::consts::{BASE_Z_INDEX, DRAG_Z_INDEX, MIN_NOTE_SIZE};
use crate::doc::{NoteHeight, NoteId, NotePatch, NoteStore};
use crate::hit::Target;

/// Active gesture, if any.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the empty canvas moves the viewport.
    Panning {
        /// Screen-space pointer position at pointer-down.
        start_screen: Point,
        orig_pan_x: f64,
        orig_pan_y: f64,
    },
    /// Moving a note by its header.
    DraggingNote {
        id: NoteId,
        /// Screen-space pointer position at pointer-down.
        start_screen: Point,
        /// Note x at the start of the drag.
        orig_x: f64,
        /// Note y at the start of the drag.
        orig_y: f64,
    },
    /// Resizing a note by its bottom-right handle.
    ResizingNote {
        id: NoteId,
        /// Screen-space pointer position at pointer-down.
        start_screen: Point,
        orig_width: f64,
        /// Starting height; `auto` notes start from the default extent.
        orig_height: f64,
    },
}

impl InputState {
    /// Returns `true` when no gesture is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The note being dragged or resized, if any.
    #[must_use]
    pub fn active_note(&self) -> Option<NoteId> {
        match self {
            Self::DraggingNote { id, .. } | Self::ResizingNote { id, .. } => Some(*id),
            Self::Idle | Self::Panning { .. } => None,
        }
    }

    /// Start a gesture for a pointer-down on `target`.
    ///
    /// Background starts a pan, a note header starts a drag (raising the note
    /// to the drag layer), and a resize handle starts a resize. Content areas,
    /// controls, and notes missing from the store start nothing.
    #[must_use]
    pub fn begin(target: Target, screen: Point, camera: &Camera, notes: &mut NoteStore) -> Self {
        match target {
            Target::Background => Self::Panning {
                start_screen: screen,
                orig_pan_x: camera.pan_x,
                orig_pan_y: camera.pan_y,
            },
            Target::NoteBody(id) => {
                let Some(note) = notes.get_mut(&id) else {
                    return Self::Idle;
                };
                note.z_index = DRAG_Z_INDEX;
                Self::DraggingNote { id, start_screen: screen, orig_x: note.x, orig_y: note.y }
            }
            Target::ResizeHandle(id) => match notes.get(&id) {
                Some(note) => Self::ResizingNote {
                    id,
                    start_screen: screen,
                    orig_width: note.width,
                    orig_height: note.height.extent(),
                },
                None => Self::Idle,
            },
            Target::NoteContent(_) | Target::NoDrag => Self::Idle,
        }
    }

    /// Apply the pointer's current position to the viewport or note.
    ///
    /// Pan deltas are raw screen pixels; drag and resize deltas are divided by
    /// the zoom so the note tracks the pointer. Returns `true` if anything moved.
    pub fn update(&self, screen: Point, camera: &mut Camera, notes: &mut NoteStore) -> bool {
        match *self {
            Self::Idle => false,
            Self::Panning { start_screen, orig_pan_x, orig_pan_y } => {
                camera.pan_x = orig_pan_x + (screen.x - start_screen.x);
                camera.pan_y = orig_pan_y + (screen.y - start_screen.y);
                true
            }
            Self::DraggingNote { id, start_screen, orig_x, orig_y } => {
                let Some(note) = notes.get_mut(&id) else {
                    return false;
                };
                note.x = orig_x + camera.screen_dist_to_world(screen.x - start_screen.x);
                note.y = orig_y + camera.screen_dist_to_world(screen.y - start_screen.y);
                true
            }
            Self::ResizingNote { id, start_screen, orig_width, orig_height } => {
                let Some(note) = notes.get_mut(&id) else {
                    return false;
                };
                note.width = (orig_width + camera.screen_dist_to_world(screen.x - start_screen.x)).max(MIN_NOTE_SIZE);
                let h = (orig_height + camera.screen_dist_to_world(screen.y - start_screen.y)).max(MIN_NOTE_SIZE);
                note.height = NoteHeight::Fixed(h);
                true
            }
        }
    }

    /// Finish the gesture at `screen`.
    ///
    /// Returns the note and the fields to persist: `{x, y, zIndex}` for a
    /// drag (the note drops back to the base layer), `{width, height}` for a
    /// resize, nothing for a pan.
    pub fn commit(self, screen: Point, camera: &mut Camera, notes: &mut NoteStore) -> Option<(NoteId, NotePatch)> {
        self.update(screen, camera, notes);
        match self {
            Self::Idle | Self::Panning { .. } => None,
            Self::DraggingNote { id, .. } => {
                let note = notes.get_mut(&id)?;
                note.z_index = BASE_Z_INDEX;
                let patch = NotePatch {
                    x: Some(note.x),
                    y: Some(note.y),
                    z_index: Some(BASE_Z_INDEX),
                    ..NotePatch::default()
                };
                Some((id, patch))
            }
            Self::ResizingNote { id, .. } => {
                let note = notes.get(&id)?;
                let patch = NotePatch {
                    width: Some(note.width),
                    height: Some(note.height),
                    ..NotePatch::default()
                };
                Some((id, patch))
            }
        }
    }
}
