#![allow(clippy::float_cmp)]

use serde_json::json;
use uuid::Uuid;

use super::*;

fn text_note(z: i32) -> Note {
    Note {
        id: Uuid::new_v4(),
        board_id: Uuid::new_v4(),
        kind: NoteKind::Text,
        content: String::new(),
        color: DEFAULT_NOTE_COLOR.to_owned(),
        width: 250.0,
        height: NoteHeight::Fixed(200.0),
        x: 0.0,
        y: 0.0,
        z_index: z,
    }
}

// =============================================================
// NoteKind
// =============================================================

#[test]
fn kind_wire_names_are_lowercase() {
    assert_eq!(serde_json::to_value(NoteKind::Text).unwrap(), json!("text"));
    assert_eq!(serde_json::to_value(NoteKind::Plaintext).unwrap(), json!("plaintext"));
    assert_eq!(serde_json::to_value(NoteKind::Image).unwrap(), json!("image"));
}

#[test]
fn kind_rejects_unknown_name() {
    assert!(serde_json::from_value::<NoteKind>(json!("sticker")).is_err());
}

#[test]
fn kind_defaults_follow_note_type() {
    assert_eq!(NoteKind::Text.default_width(), 250.0);
    assert_eq!(NoteKind::Image.default_width(), 300.0);
    assert_eq!(NoteKind::Plaintext.default_height(), NoteHeight::Fixed(200.0));
    assert_eq!(NoteKind::Image.default_height(), NoteHeight::Auto);
    assert_eq!(NoteKind::Text.default_color(), "#FEF3C7");
    assert_eq!(NoteKind::Plaintext.default_color(), "transparent");
    assert_eq!(NoteKind::Image.default_color(), "transparent");
}

#[test]
fn only_text_notes_are_colored() {
    assert!(NoteKind::Text.has_color());
    assert!(!NoteKind::Plaintext.has_color());
    assert!(!NoteKind::Image.has_color());
    assert!(!NoteKind::Image.is_textual());
}

#[test]
fn new_sticky_color_comes_from_palette() {
    assert!(crate::consts::NOTE_PALETTE.contains(&NoteKind::Text.default_color()));
    assert!(!crate::consts::NOTE_PALETTE.contains(&NoteKind::Plaintext.default_color()));
}

// =============================================================
// NoteHeight
// =============================================================

#[test]
fn height_accepts_number_or_auto() {
    assert_eq!(serde_json::from_value::<NoteHeight>(json!(180.5)).unwrap(), NoteHeight::Fixed(180.5));
    assert_eq!(serde_json::from_value::<NoteHeight>(json!("auto")).unwrap(), NoteHeight::Auto);
    assert_eq!(serde_json::to_value(NoteHeight::Auto).unwrap(), json!("auto"));
    assert_eq!(serde_json::to_value(NoteHeight::Fixed(120.0)).unwrap(), json!(120.0));
}

#[test]
fn height_rejects_other_keywords() {
    assert!(serde_json::from_value::<NoteHeight>(json!("tall")).is_err());
}

#[test]
fn auto_height_has_default_extent() {
    assert_eq!(NoteHeight::Auto.extent(), 200.0);
    assert_eq!(NoteHeight::Fixed(75.0).extent(), 75.0);
}

// =============================================================
// Note wire shape
// =============================================================

#[test]
fn note_deserializes_from_server_json() {
    let id = Uuid::new_v4();
    let board = Uuid::new_v4();
    let note: Note = serde_json::from_value(json!({
        "id": id,
        "boardId": board,
        "type": "image",
        "content": "data:image/png;base64,AAAA",
        "color": "transparent",
        "width": 300,
        "height": "auto",
        "x": -12.5,
        "y": 40,
        "zIndex": 1,
        "createdAt": "2024-05-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(note.id, id);
    assert_eq!(note.board_id, board);
    assert_eq!(note.kind, NoteKind::Image);
    assert_eq!(note.height, NoteHeight::Auto);
    assert_eq!(note.x, -12.5);
    assert_eq!(note.z_index, 1);
}

#[test]
fn note_serializes_camel_case_fields() {
    let note = text_note(3);
    let value = serde_json::to_value(&note).unwrap();
    assert_eq!(value["type"], json!("text"));
    assert_eq!(value["zIndex"], json!(3));
    assert!(value.get("boardId").is_some());
    assert!(value.get("kind").is_none());
}

#[test]
fn contains_uses_auto_height_extent() {
    let mut note = text_note(1);
    note.height = NoteHeight::Auto;
    note.x = 10.0;
    note.y = 10.0;
    assert!(note.contains(Point::new(10.0, 10.0)));
    assert!(note.contains(Point::new(260.0, 210.0)));
    assert!(!note.contains(Point::new(260.1, 100.0)));
    assert!(!note.contains(Point::new(100.0, 210.1)));
}

#[test]
fn board_ignores_owner_and_timestamp() {
    let board: Board = serde_json::from_value(json!({
        "id": Uuid::nil(),
        "userEmail": "a@b.c",
        "name": "My Board",
        "createdAt": "2024-05-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(board.name, "My Board");
}

// =============================================================
// NotePatch
// =============================================================

#[test]
fn patch_serializes_only_present_fields() {
    let patch = NotePatch { x: Some(20.0), y: Some(13.0), z_index: Some(1), ..NotePatch::default() };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "x": 20.0, "y": 13.0, "zIndex": 1 }));
}

#[test]
fn empty_patch_reports_empty() {
    assert!(NotePatch::default().is_empty());
    assert!(!NotePatch { color: Some("#DBEAFE".into()), ..NotePatch::default() }.is_empty());
}

#[test]
fn draft_uses_type_field() {
    let draft = NoteDraft {
        board_id: Uuid::nil(),
        kind: NoteKind::Plaintext,
        content: "hi".into(),
        color: "transparent".into(),
        width: 250.0,
        height: NoteHeight::Fixed(200.0),
        x: 1.0,
        y: 2.0,
    };
    let value = serde_json::to_value(&draft).unwrap();
    assert_eq!(value["type"], json!("plaintext"));
    assert_eq!(value["boardId"], json!(Uuid::nil()));
}

// =============================================================
// NoteStore
// =============================================================

#[test]
fn insert_appends_then_replaces_in_place() {
    let mut store = NoteStore::new();
    let a = text_note(1);
    let b = text_note(1);
    store.insert(a.clone());
    store.insert(b.clone());

    let mut edited = a.clone();
    edited.content = "edited".into();
    store.insert(edited);

    assert_eq!(store.len(), 2);
    assert_eq!(store.notes()[0].id, a.id);
    assert_eq!(store.notes()[0].content, "edited");
    assert_eq!(store.notes()[1].id, b.id);
}

#[test]
fn remove_returns_note_and_missing_is_none() {
    let mut store = NoteStore::new();
    let a = text_note(1);
    store.insert(a.clone());
    assert_eq!(store.remove(&a.id).map(|n| n.id), Some(a.id));
    assert!(store.remove(&a.id).is_none());
    assert!(store.is_empty());
}

#[test]
fn apply_patch_touches_only_present_fields() {
    let mut store = NoteStore::new();
    let a = text_note(1);
    store.insert(a.clone());

    let patch = NotePatch { width: Some(320.0), content: Some("todo".into()), ..NotePatch::default() };
    assert!(store.apply_patch(&a.id, &patch));

    let note = store.get(&a.id).unwrap();
    assert_eq!(note.width, 320.0);
    assert_eq!(note.content, "todo");
    assert_eq!(note.height, NoteHeight::Fixed(200.0));
    assert_eq!(note.color, DEFAULT_NOTE_COLOR);
}

#[test]
fn patch_applies_to_borrowed_fields() {
    let (mut x, mut y, mut width, mut z_index) = (1.0, 2.0, 250.0, 1);
    let mut height = NoteHeight::Auto;
    let (mut content, mut color) = (String::from("old"), String::from("#FEF3C7"));
    let patch = NotePatch {
        y: Some(-40.0),
        height: Some(NoteHeight::Fixed(120.0)),
        z_index: Some(7),
        color: Some("#DBEAFE".into()),
        ..NotePatch::default()
    };
    patch.apply_to(NoteFields {
        x: &mut x,
        y: &mut y,
        width: &mut width,
        height: &mut height,
        z_index: &mut z_index,
        content: &mut content,
        color: &mut color,
    });
    assert_eq!((x, y, width, z_index), (1.0, -40.0, 250.0, 7));
    assert_eq!(height, NoteHeight::Fixed(120.0));
    assert_eq!(content, "old");
    assert_eq!(color, "#DBEAFE");
}

#[test]
fn apply_patch_on_missing_note_returns_false() {
    let mut store = NoteStore::new();
    assert!(!store.apply_patch(&Uuid::new_v4(), &NotePatch { x: Some(1.0), ..NotePatch::default() }));
}

#[test]
fn load_snapshot_replaces_everything() {
    let mut store = NoteStore::new();
    store.insert(text_note(1));
    let fresh = vec![text_note(2), text_note(5)];
    let ids: Vec<_> = fresh.iter().map(|n| n.id).collect();
    store.load_snapshot(fresh);
    assert_eq!(store.notes().iter().map(|n| n.id).collect::<Vec<_>>(), ids);
}

#[test]
fn render_order_sorts_by_z_and_keeps_ties_stable() {
    let mut store = NoteStore::new();
    let high = text_note(100);
    let first = text_note(1);
    let second = text_note(1);
    store.insert(high.clone());
    store.insert(first.clone());
    store.insert(second.clone());

    let order: Vec<_> = store.render_order().into_iter().map(|n| n.id).collect();
    assert_eq!(order, vec![first.id, second.id, high.id]);
    // insertion order itself is untouched
    assert_eq!(store.notes()[0].id, high.id);
}

#[test]
fn clear_empties_store() {
    let mut store = NoteStore::new();
    store.insert(text_note(1));
    store.clear();
    assert_eq!(store.len(), 0);
}
