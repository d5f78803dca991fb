//! To-do list service.
//!
//! DESIGN
//! ======
//! A new task is appended: its `order` is the owner's task count at the time
//! of creation. Reordering takes the full list of ids in display order and
//! rewrites each task's `order` to its index. The id list is validated as a
//! whole, so a single malformed id rejects the request with nothing written.

#[cfg(test)]
#[path = "todo_test.rs"]
mod todo_test;

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{self, Store, StoreError, TaskChanges, TaskRecord};

#[derive(Debug, thiserror::Error)]
pub enum TodoError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderInput {
    #[serde(default)]
    pub task_ids: Vec<String>,
}

fn owner(email: &str) -> Result<String, TodoError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(TodoError::Invalid("User email is required."));
    }
    Ok(email)
}

/// Tasks of a user in display order.
///
/// # Errors
///
/// `Invalid` for a blank email.
pub async fn list_tasks(store: &dyn Store, email: &str) -> Result<Vec<TaskRecord>, TodoError> {
    Ok(store.list_tasks(&owner(email)?).await?)
}

/// Append a task to the user's list.
///
/// # Errors
///
/// `Invalid` for blank content or email.
pub async fn create_task(store: &dyn Store, input: CreateTaskInput) -> Result<TaskRecord, TodoError> {
    let content = input.content.trim();
    if content.is_empty() {
        return Err(TodoError::Invalid("Task content is required."));
    }
    let user_email = owner(&input.user_email)?;
    let count = store.count_tasks(&user_email).await?;
    let order = i32::try_from(count).map_err(|_| TodoError::Invalid("Too many tasks."))?;

    let task = TaskRecord {
        id: Uuid::new_v4(),
        user_email,
        content: content.to_owned(),
        is_completed: false,
        order,
        created_at: store::now(),
    };
    store.insert_task(&task).await?;
    info!(task_id = %task.id, order, "task created");
    Ok(task)
}

/// Toggle completion and/or edit content. Missing tasks are a no-op.
///
/// # Errors
///
/// `Invalid` if `content` is present but blank.
pub async fn update_task(store: &dyn Store, id: Uuid, changes: TaskChanges) -> Result<(), TodoError> {
    let changes = match changes.content.as_deref().map(str::trim) {
        Some("") => return Err(TodoError::Invalid("Task content is required.")),
        Some(content) => TaskChanges { content: Some(content.to_owned()), ..changes },
        None => changes,
    };
    if changes == TaskChanges::default() {
        return Ok(());
    }
    if !store.update_task(id, &changes).await? {
        warn!(task_id = %id, "update for missing task ignored");
    }
    Ok(())
}

/// Rewrite every listed task's `order` to its position in `task_ids`.
///
/// # Errors
///
/// `Invalid` if any id is malformed or listed twice; no task is touched in that case.
pub async fn reorder_tasks(store: &dyn Store, input: ReorderInput) -> Result<(), TodoError> {
    let ids = input
        .task_ids
        .iter()
        .map(|raw| Uuid::parse_str(raw.trim()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| TodoError::Invalid("Invalid Task ID."))?;
    let mut seen = HashSet::with_capacity(ids.len());
    if !ids.iter().all(|id| seen.insert(*id)) {
        return Err(TodoError::Invalid("Invalid Task ID."));
    }
    store.reorder_tasks(&ids).await?;
    info!(count = ids.len(), "tasks reordered");
    Ok(())
}

/// Delete a task. Remaining tasks keep their `order` values.
///
/// # Errors
///
/// `Store` on persistence failure.
pub async fn delete_task(store: &dyn Store, id: Uuid) -> Result<(), TodoError> {
    if store.delete_task(id).await? {
        info!(task_id = %id, "task deleted");
    }
    Ok(())
}
