use canvas::doc::{NoteHeight, NoteKind};

use super::*;
use crate::store::{MemoryStore, NoteRecord};

fn create_input(email: &str, name: &str) -> CreateBoardInput {
    CreateBoardInput { user_email: email.into(), name: name.into() }
}

fn note_on(board_id: Uuid) -> NoteRecord {
    NoteRecord {
        id: Uuid::new_v4(),
        board_id,
        kind: NoteKind::Plaintext,
        content: "x".into(),
        color: "transparent".into(),
        width: 250.0,
        height: NoteHeight::Fixed(200.0),
        x: 0.0,
        y: 0.0,
        z_index: 1,
        created_at: store::now(),
    }
}

#[tokio::test]
async fn first_fetch_creates_exactly_one_default_board() {
    let store = MemoryStore::new();
    let first = list_boards(&store, "ada@example.com").await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, DEFAULT_BOARD_NAME);

    let second = list_boards(&store, "ada@example.com").await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn concurrent_first_fetches_agree_on_one_board() {
    let store = MemoryStore::new();
    let (a, b) = tokio::join!(list_boards(&store, "ada@example.com"), list_boards(&store, "ada@example.com"));
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.len(), 1);
    assert_eq!(a, b);
}

#[tokio::test]
async fn existing_boards_suppress_the_default() {
    let store = MemoryStore::new();
    let made = create_board(&store, create_input("ada@example.com", "Work")).await.unwrap();
    let boards = list_boards(&store, "ADA@example.com").await.unwrap();
    assert_eq!(boards, vec![made]);
}

#[tokio::test]
async fn blank_name_uses_default() {
    let store = MemoryStore::new();
    let board = create_board(&store, create_input("ada@example.com", "   ")).await.unwrap();
    assert_eq!(board.name, DEFAULT_BOARD_NAME);
}

#[tokio::test]
async fn blank_email_is_invalid() {
    let store = MemoryStore::new();
    assert!(matches!(list_boards(&store, " ").await, Err(BoardError::Invalid(_))));
    assert!(matches!(create_board(&store, create_input("", "x")).await, Err(BoardError::Invalid(_))));
}

#[tokio::test]
async fn delete_removes_exactly_its_notes() {
    let store = MemoryStore::new();
    let doomed = create_board(&store, create_input("ada@example.com", "Doomed")).await.unwrap();
    let kept = create_board(&store, create_input("ada@example.com", "Kept")).await.unwrap();
    store.insert_note(&note_on(doomed.id)).await.unwrap();
    store.insert_note(&note_on(doomed.id)).await.unwrap();
    let survivor = note_on(kept.id);
    store.insert_note(&survivor).await.unwrap();

    delete_board(&store, doomed.id).await.unwrap();

    assert!(store.list_notes(doomed.id).await.unwrap().is_empty());
    assert_eq!(store.list_notes(kept.id).await.unwrap(), vec![survivor]);
    // deleting again is a quiet no-op
    delete_board(&store, doomed.id).await.unwrap();
}
