use super::*;
use crate::store::MemoryStore;

const EMAIL: &str = "ada@example.com";

async fn add(store: &MemoryStore, content: &str) -> TaskRecord {
    create_task(store, CreateTaskInput { user_email: EMAIL.into(), content: content.into() }).await.unwrap()
}

#[tokio::test]
async fn order_on_create_is_current_count() {
    let store = MemoryStore::new();
    let a = add(&store, "a").await;
    let b = add(&store, "b").await;
    let c = add(&store, "c").await;
    assert_eq!((a.order, b.order, c.order), (0, 1, 2));
    assert!(!a.is_completed);
}

#[tokio::test]
async fn blank_content_is_rejected() {
    let store = MemoryStore::new();
    let input = CreateTaskInput { user_email: EMAIL.into(), content: "   ".into() };
    assert!(matches!(create_task(&store, input).await, Err(TodoError::Invalid(_))));
    assert_eq!(store.count_tasks(EMAIL).await.unwrap(), 0);
}

#[tokio::test]
async fn reorder_c_a_b() {
    let store = MemoryStore::new();
    let a = add(&store, "a").await;
    let b = add(&store, "b").await;
    let c = add(&store, "c").await;

    let input = ReorderInput { task_ids: vec![c.id.to_string(), a.id.to_string(), b.id.to_string()] };
    reorder_tasks(&store, input).await.unwrap();

    let tasks = list_tasks(&store, EMAIL).await.unwrap();
    let orders: Vec<_> = tasks.iter().map(|t| (t.content.as_str(), t.order)).collect();
    assert_eq!(orders, vec![("c", 0), ("a", 1), ("b", 2)]);
}

#[tokio::test]
async fn malformed_id_rejects_whole_reorder() {
    let store = MemoryStore::new();
    let a = add(&store, "a").await;
    let b = add(&store, "b").await;

    let input = ReorderInput { task_ids: vec![b.id.to_string(), "garbage".into(), a.id.to_string()] };
    assert!(matches!(reorder_tasks(&store, input).await, Err(TodoError::Invalid(_))));

    let tasks = list_tasks(&store, EMAIL).await.unwrap();
    assert_eq!(tasks.iter().map(|t| t.order).collect::<Vec<_>>(), vec![0, 1]);
    assert_eq!(tasks[0].id, a.id);
}

#[tokio::test]
async fn repeated_id_rejects_whole_reorder() {
    let store = MemoryStore::new();
    let a = add(&store, "a").await;
    let b = add(&store, "b").await;

    let input = ReorderInput { task_ids: vec![a.id.to_string(), a.id.to_string(), b.id.to_string()] };
    let result = reorder_tasks(&store, input).await;
    assert!(matches!(result, Err(TodoError::Invalid("Invalid Task ID."))));

    let orders: Vec<_> = list_tasks(&store, EMAIL).await.unwrap().iter().map(|t| (t.content.clone(), t.order)).collect();
    assert_eq!(orders, vec![("a".to_owned(), 0), ("b".to_owned(), 1)]);
}

#[tokio::test]
async fn update_toggles_and_edits() {
    let store = MemoryStore::new();
    let task = add(&store, "draft").await;

    update_task(&store, task.id, TaskChanges { is_completed: Some(true), content: None }).await.unwrap();
    update_task(&store, task.id, TaskChanges { is_completed: None, content: Some(" final ".into()) })
        .await
        .unwrap();

    let stored = &list_tasks(&store, EMAIL).await.unwrap()[0];
    assert!(stored.is_completed);
    assert_eq!(stored.content, "final");
}

#[tokio::test]
async fn update_rejects_blank_content() {
    let store = MemoryStore::new();
    let task = add(&store, "keep").await;
    let result = update_task(&store, task.id, TaskChanges { is_completed: Some(true), content: Some(String::new()) }).await;
    assert!(matches!(result, Err(TodoError::Invalid(_))));
    assert!(!list_tasks(&store, EMAIL).await.unwrap()[0].is_completed);
}

#[tokio::test]
async fn delete_then_create_counts_remaining() {
    let store = MemoryStore::new();
    let a = add(&store, "a").await;
    add(&store, "b").await;
    delete_task(&store, a.id).await.unwrap();
    let c = add(&store, "c").await;
    assert_eq!(c.order, 1);
}
