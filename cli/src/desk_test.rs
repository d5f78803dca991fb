#![allow(clippy::float_cmp)]

use std::time::Duration;

use canvas::doc::{NoteHeight, NotePatch};
use canvas::engine::SessionPhase;

use super::*;
use crate::api::test_helpers::MockApi;

const FAST: RetryConfig = RetryConfig { attempts: 2, base: Duration::from_millis(1) };

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

async fn desk_over(api: &Arc<MockApi>) -> Desk {
    Desk::open(api.clone(), "ada@example.com", FAST).await.unwrap()
}

// =============================================================================
// OPENING
// =============================================================================

#[tokio::test]
async fn open_activates_first_board_with_its_notes() {
    let (api, board_id) = MockApi::with_board("My Board");
    let note = api.add_note(board_id, 10.0, 10.0);
    let api = Arc::new(api);

    let desk = desk_over(&api).await;

    assert_eq!(desk.session().phase(), SessionPhase::Ready { board_id });
    assert_eq!(desk.session().note(&note.id), Some(&note));
    assert!(desk.renders() > 0);
}

#[tokio::test]
async fn open_without_boards_stays_empty() {
    let api = Arc::new(MockApi::default());
    let mut desk = desk_over(&api).await;
    assert_eq!(desk.session().phase(), SessionPhase::NoBoard);
    assert_eq!(desk.create_note(NoteKind::Text, "").await.unwrap(), None);
}

// =============================================================================
// GESTURES
// =============================================================================

#[tokio::test]
async fn drag_at_zoom_two_persists_one_update() {
    let (api, board_id) = MockApi::with_board("b");
    let note = api.add_note(board_id, 10.0, 10.0);
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    desk.zoom(1.0);
    assert_eq!(desk.session().camera().zoom, 2.0);

    desk.drag(note.id, pt(100.0, 100.0), pt(120.0, 106.0)).await.unwrap();
    let local = desk.session().note(&note.id).unwrap();
    assert_eq!((local.x, local.y, local.z_index), (20.0, 13.0, 1));

    desk.settle().await.unwrap();
    let expected = NotePatch { x: Some(20.0), y: Some(13.0), z_index: Some(1), ..NotePatch::default() };
    assert_eq!(*api.applied.lock().unwrap(), vec![Write::UpdateNote { id: note.id, fields: expected }]);
    assert!(!desk.session().is_unsynced(&note.id));
}

#[tokio::test]
async fn resize_clamps_and_persists_size() {
    let (api, board_id) = MockApi::with_board("b");
    let note = api.add_note(board_id, 0.0, 0.0);
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    desk.resize(note.id, pt(250.0, 200.0), pt(50.0, 0.0)).await.unwrap();
    desk.settle().await.unwrap();

    let stored = api.stored_note(note.id).unwrap();
    assert_eq!(stored.width, 100.0);
    assert_eq!(stored.height, NoteHeight::Fixed(100.0));
}

#[tokio::test]
async fn pan_writes_nothing() {
    let (api, _) = MockApi::with_board("b");
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    desk.pan(pt(0.0, 0.0), pt(40.0, -10.0)).await.unwrap();
    desk.settle().await.unwrap();

    let camera = desk.session().camera();
    assert_eq!((camera.pan_x, camera.pan_y), (40.0, -10.0));
    assert!(api.applied.lock().unwrap().is_empty());
}

// =============================================================================
// SYNC FLAGS
// =============================================================================

#[tokio::test]
async fn failed_write_flags_note_without_reverting() {
    let (api, board_id) = MockApi::with_board("b");
    let note = api.add_note(board_id, 0.0, 0.0);
    api.reject_writes(true);
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    desk.drag(note.id, pt(0.0, 0.0), pt(30.0, 40.0)).await.unwrap();
    desk.settle().await.unwrap();

    assert!(desk.session().is_unsynced(&note.id));
    let local = desk.session().note(&note.id).unwrap();
    assert_eq!((local.x, local.y), (30.0, 40.0));
    assert_eq!(api.stored_note(note.id).unwrap().x, 0.0);

    api.reject_writes(false);
    desk.drag(note.id, pt(30.0, 40.0), pt(35.0, 40.0)).await.unwrap();
    desk.settle().await.unwrap();

    assert!(!desk.session().is_unsynced(&note.id));
    assert_eq!(api.stored_note(note.id).unwrap().x, 35.0);
}

// =============================================================================
// NOTES AND BOARDS
// =============================================================================

#[tokio::test]
async fn created_note_is_centered_and_confirmed() {
    let (api, board_id) = MockApi::with_board("b");
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    let id = desk.create_note(NoteKind::Text, "hello").await.unwrap().unwrap();

    let note = desk.session().note(&id).unwrap();
    assert_eq!((note.x, note.y), (275.0, 200.0));
    assert_eq!(note.board_id, board_id);
    assert_eq!(api.stored_note(id).unwrap().content, "hello");
}

#[tokio::test]
async fn text_edit_and_color_reach_the_server() {
    let (api, board_id) = MockApi::with_board("b");
    let note = api.add_note(board_id, 0.0, 0.0);
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    assert!(desk.edit_text(note.id, "groceries").await.unwrap());
    desk.set_color(note.id, "#DBEAFE").await.unwrap();
    desk.settle().await.unwrap();

    let stored = api.stored_note(note.id).unwrap();
    assert_eq!(stored.content, "groceries");
    assert_eq!(stored.color, "#DBEAFE");
}

#[tokio::test]
async fn deleting_active_board_moves_to_next() {
    let (api, first) = MockApi::with_board("first");
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;
    let second = desk.create_board("second").await.unwrap();
    assert_eq!(desk.session().active_board(), Some(second));

    desk.delete_board(second).await.unwrap();
    desk.settle().await.unwrap();

    assert_eq!(desk.session().active_board(), Some(first));
    assert_eq!(*api.applied.lock().unwrap(), vec![Write::DeleteBoard { id: second }]);
    desk.close().await;
}

#[tokio::test]
async fn delete_note_is_queued() {
    let (api, board_id) = MockApi::with_board("b");
    let note = api.add_note(board_id, 0.0, 0.0);
    let api = Arc::new(api);
    let mut desk = desk_over(&api).await;

    desk.delete_note(note.id).await.unwrap();
    assert!(desk.session().note(&note.id).is_none());
    desk.settle().await.unwrap();
    assert!(api.stored_note(note.id).is_none());
}
