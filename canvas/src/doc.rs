//! Note model: board notes, their geometry, and the in-memory store.
//!
//! This module defines what lives on a board canvas (`Note`, `NoteKind`,
//! `NoteHeight`), a sparse-update type for persisted edits (`NotePatch`), the
//! creation request built by the session (`NoteDraft`), and the runtime store
//! that owns the active board's notes (`NoteStore`).
//!
//! Data flows into this layer from the network (JSON deserialization of
//! `GET /api/notes`) and from the interaction controller (live gesture
//! mutations). Field names on the wire are camelCase.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{
    DEFAULT_NOTE_COLOR, DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, IMAGE_NOTE_WIDTH, TRANSPARENT_COLOR,
};

/// Unique identifier for a note.
pub type NoteId = Uuid;

/// Unique identifier for a board.
pub type BoardId = Uuid;

/// The kind of a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    /// Colored sticky note with editable text.
    #[default]
    Text,
    /// Borderless, transparent text label.
    Plaintext,
    /// Image; `content` holds the encoded image payload (a data URL).
    Image,
}

impl NoteKind {
    /// Width given to a freshly created note of this kind.
    #[must_use]
    pub fn default_width(self) -> f64 {
        match self {
            Self::Image => IMAGE_NOTE_WIDTH,
            Self::Text | Self::Plaintext => DEFAULT_NOTE_WIDTH,
        }
    }

    /// Height given to a freshly created note of this kind.
    #[must_use]
    pub fn default_height(self) -> NoteHeight {
        match self {
            Self::Image => NoteHeight::Auto,
            Self::Text | Self::Plaintext => NoteHeight::Fixed(DEFAULT_NOTE_HEIGHT),
        }
    }

    /// Background color given to a freshly created note of this kind.
    #[must_use]
    pub fn default_color(self) -> &'static str {
        if self.has_color() { DEFAULT_NOTE_COLOR } else { TRANSPARENT_COLOR }
    }

    /// Whether the note's `color` field is shown. Plain-text and image notes ignore it.
    #[must_use]
    pub fn has_color(self) -> bool {
        matches!(self, Self::Text)
    }

    /// Whether the note body holds an editable text area.
    #[must_use]
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::Plaintext)
    }
}

/// Note height: a number of world units, or `"auto"` to follow the content
/// (image notes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "HeightRepr", into = "HeightRepr")]
pub enum NoteHeight {
    Fixed(f64),
    Auto,
}

impl NoteHeight {
    /// Height used for geometry. `Auto` counts as [`DEFAULT_NOTE_HEIGHT`].
    #[must_use]
    pub fn extent(self) -> f64 {
        match self {
            Self::Fixed(h) => h,
            Self::Auto => DEFAULT_NOTE_HEIGHT,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HeightRepr {
    Number(f64),
    Keyword(String),
}

impl TryFrom<HeightRepr> for NoteHeight {
    type Error = String;

    fn try_from(repr: HeightRepr) -> Result<Self, Self::Error> {
        match repr {
            HeightRepr::Number(h) => Ok(Self::Fixed(h)),
            HeightRepr::Keyword(k) if k == "auto" => Ok(Self::Auto),
            HeightRepr::Keyword(k) => Err(format!("invalid note height {k:?}; expected a number or \"auto\"")),
        }
    }
}

impl From<NoteHeight> for HeightRepr {
    fn from(height: NoteHeight) -> Self {
        match height {
            NoteHeight::Fixed(h) => Self::Number(h),
            NoteHeight::Auto => Self::Keyword("auto".to_owned()),
        }
    }
}

/// A board note as held in memory and received from the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub board_id: BoardId,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub content: String,
    pub color: String,
    /// Width in world units.
    pub width: f64,
    pub height: NoteHeight,
    /// Left edge in world coordinates.
    pub x: f64,
    /// Top edge in world coordinates.
    pub y: f64,
    /// Stacking order; higher values are drawn on top.
    pub z_index: i32,
}

impl Note {
    /// Whether `world` falls inside the note's bounding box.
    #[must_use]
    pub fn contains(&self, world: Point) -> bool {
        world.x >= self.x
            && world.x <= self.x + self.width
            && world.y >= self.y
            && world.y <= self.y + self.height.extent()
    }

    pub fn fields_mut(&mut self) -> NoteFields<'_> {
        NoteFields {
            x: &mut self.x,
            y: &mut self.y,
            width: &mut self.width,
            height: &mut self.height,
            z_index: &mut self.z_index,
            content: &mut self.content,
            color: &mut self.color,
        }
    }
}

/// A board as listed in the board tabs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
}

/// Sparse update for a note. Only present fields are applied or sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<NoteHeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NotePatch {
    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.width.is_none()
            && self.height.is_none()
            && self.z_index.is_none()
            && self.content.is_none()
            && self.color.is_none()
    }

    /// Write the present fields into `fields`, leaving the rest untouched.
    pub fn apply_to(&self, fields: NoteFields<'_>) {
        if let Some(x) = self.x {
            *fields.x = x;
        }
        if let Some(y) = self.y {
            *fields.y = y;
        }
        if let Some(w) = self.width {
            *fields.width = w;
        }
        if let Some(h) = self.height {
            *fields.height = h;
        }
        if let Some(z) = self.z_index {
            *fields.z_index = z;
        }
        if let Some(content) = &self.content {
            fields.content.clone_from(content);
        }
        if let Some(color) = &self.color {
            fields.color.clone_from(color);
        }
    }
}

/// Mutable view of the patchable fields of any note representation.
pub struct NoteFields<'a> {
    pub x: &'a mut f64,
    pub y: &'a mut f64,
    pub width: &'a mut f64,
    pub height: &'a mut NoteHeight,
    pub z_index: &'a mut i32,
    pub content: &'a mut String,
    pub color: &'a mut String,
}

/// Creation request for a new note, as posted to `POST /api/notes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub board_id: BoardId,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub content: String,
    pub color: String,
    pub width: f64,
    pub height: NoteHeight,
    pub x: f64,
    pub y: f64,
}

/// In-memory store of the active board's notes, in display-insertion order.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    notes: Vec<Note>,
}

impl NoteStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// Append a note, or replace it in place if one with the same `id` exists.
    pub fn insert(&mut self, note: Note) {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note,
            None => self.notes.push(note),
        }
    }

    /// Remove a note by id, returning it if it was present.
    pub fn remove(&mut self, id: &NoteId) -> Option<Note> {
        let idx = self.notes.iter().position(|n| n.id == *id)?;
        Some(self.notes.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == *id)
    }

    pub fn get_mut(&mut self, id: &NoteId) -> Option<&mut Note> {
        self.notes.iter_mut().find(|n| n.id == *id)
    }

    /// Apply a sparse update to an existing note. Returns false if the note doesn't exist.
    pub fn apply_patch(&mut self, id: &NoteId, patch: &NotePatch) -> bool {
        let Some(note) = self.get_mut(id) else {
            return false;
        };
        patch.apply_to(note.fields_mut());
        true
    }

    /// Replace all notes with a full snapshot, keeping the snapshot's order.
    pub fn load_snapshot(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Notes in insertion order.
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes in draw order: ascending `z_index`, ties kept in insertion order.
    #[must_use]
    pub fn render_order(&self) -> Vec<&Note> {
        let mut sorted: Vec<&Note> = self.notes.iter().collect();
        sorted.sort_by_key(|n| n.z_index);
        sorted
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}
