//! Shared numeric constants for the canvas crate.

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.2;

/// Largest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom change applied by a single zoom-in / zoom-out step.
pub const ZOOM_STEP: f64 = 0.1;

/// Canvas size assumed until the host reports the real one, in CSS pixels.
pub const FALLBACK_VIEWPORT_WIDTH: f64 = 800.0;
pub const FALLBACK_VIEWPORT_HEIGHT: f64 = 600.0;

// ── Notes ───────────────────────────────────────────────────────

/// Lower bound for note width and height while resizing, in world units.
pub const MIN_NOTE_SIZE: f64 = 100.0;

/// Stacking order of a note at rest.
pub const BASE_Z_INDEX: i32 = 1;

/// Stacking order of a note while it is being dragged.
pub const DRAG_Z_INDEX: i32 = 100;

/// Default width of text and plain-text notes.
pub const DEFAULT_NOTE_WIDTH: f64 = 250.0;

/// Default height of text and plain-text notes. Also the extent assumed for
/// `auto`-height notes when they are resized or hit-tested.
pub const DEFAULT_NOTE_HEIGHT: f64 = 200.0;

/// Default width of image notes.
pub const IMAGE_NOTE_WIDTH: f64 = 300.0;

/// Background color of a new sticky note.
pub const DEFAULT_NOTE_COLOR: &str = NOTE_PALETTE[0];

/// Background color of plain-text and image notes.
pub const TRANSPARENT_COLOR: &str = "transparent";

/// Colors offered by the note header palette.
pub const NOTE_PALETTE: [&str; 4] = ["#FEF3C7", "#FCE7F3", "#DBEAFE", "#DCFCE7"];

// ── Hit-testing ─────────────────────────────────────────────────

/// Height of the draggable header strip at the top of a note, in world units.
pub const NOTE_HEADER_HEIGHT: f64 = 28.0;

/// Side of the square resize handle in a note's bottom-right corner, in world units.
pub const RESIZE_HANDLE_SIZE: f64 = 16.0;
