#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::consts::{NOTE_HEADER_HEIGHT, RESIZE_HANDLE_SIZE};
use crate::doc::{NoteId, NoteStore};

/// What a pointer-down landed on. Decides which gesture, if any, starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Empty canvas. Starts a pan.
    Background,
    /// A note's draggable header strip. Starts a drag.
    NoteBody(NoteId),
    /// A note's text area or image. Starts nothing.
    NoteContent(NoteId),
    /// The square handle in a note's bottom-right corner. Starts a resize.
    ResizeHandle(NoteId),
    /// A control (button, color swatch, input) that must not start a gesture.
    NoDrag,
}

impl Target {
    /// The note this target belongs to, if any.
    #[must_use]
    pub fn note_id(self) -> Option<NoteId> {
        match self {
            Self::NoteBody(id) | Self::NoteContent(id) | Self::ResizeHandle(id) => Some(id),
            Self::Background | Self::NoDrag => None,
        }
    }
}

/// Resolve the target under a screen-space point, topmost note first.
///
/// Regions are measured in world units so they scale with the note:
/// the resize handle is a [`RESIZE_HANDLE_SIZE`] square flush with the
/// bottom-right corner, the top [`NOTE_HEADER_HEIGHT`] strip is the drag
/// region, and everything else inside the note is content.
#[must_use]
pub fn hit_test(screen: Point, notes: &NoteStore, camera: &Camera) -> Target {
    let world = camera.screen_to_world(screen);
    let topmost = notes.render_order().into_iter().rev().find(|n| n.contains(world));
    let Some(note) = topmost else {
        return Target::Background;
    };

    let right = note.x + note.width;
    let bottom = note.y + note.height.extent();
    if world.x >= right - RESIZE_HANDLE_SIZE && world.y >= bottom - RESIZE_HANDLE_SIZE {
        return Target::ResizeHandle(note.id);
    }
    if world.y <= note.y + NOTE_HEADER_HEIGHT {
        return Target::NoteBody(note.id);
    }
    Target::NoteContent(note.id)
}
