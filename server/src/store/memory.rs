//! In-process `Store` backed by `tokio::sync::RwLock`.

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

use std::cmp::Reverse;

use async_trait::async_trait;
use canvas::doc::NotePatch;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    BoardRecord, LinkCategory, LinkRecord, NoteRecord, Store, StoreError, TaskChanges, TaskRecord, Theme, UserRecord,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<UserRecord>,
    boards: Vec<BoardRecord>,
    notes: Vec<NoteRecord>,
    links: Vec<LinkRecord>,
    tasks: Vec<TaskRecord>,
}

/// Store kept entirely in memory. Each vector holds rows in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn remove_where<T>(rows: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = rows.len();
    rows.retain(|r| !pred(r));
    rows.len() != before
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn set_theme(&self, email: &str, theme: Theme) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(user) = tables.users.iter_mut().find(|u| u.email == email) else {
            return Ok(false);
        };
        user.theme = theme;
        Ok(true)
    }

    async fn list_boards(&self, email: &str) -> Result<Vec<BoardRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.boards.iter().filter(|b| b.user_email == email).cloned().collect())
    }

    async fn insert_board(&self, board: &BoardRecord) -> Result<(), StoreError> {
        self.tables.write().await.boards.push(board.clone());
        Ok(())
    }

    async fn ensure_board(&self, board: &BoardRecord) -> Result<Vec<BoardRecord>, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.boards.iter().any(|b| b.user_email == board.user_email) {
            tables.boards.push(board.clone());
        }
        Ok(tables
            .boards
            .iter()
            .filter(|b| b.user_email == board.user_email)
            .cloned()
            .collect())
    }

    async fn delete_board_cascade(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        remove_where(&mut tables.notes, |n| n.board_id == id);
        Ok(remove_where(&mut tables.boards, |b| b.id == id))
    }

    async fn list_notes(&self, board_id: Uuid) -> Result<Vec<NoteRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.notes.iter().filter(|n| n.board_id == board_id).cloned().collect())
    }

    async fn insert_note(&self, note: &NoteRecord) -> Result<(), StoreError> {
        self.tables.write().await.notes.push(note.clone());
        Ok(())
    }

    async fn update_note(&self, id: Uuid, patch: &NotePatch) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(note) = tables.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        note.apply(patch);
        Ok(true)
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.notes, |n| n.id == id))
    }

    async fn list_links(&self, email: &str, category: Option<LinkCategory>) -> Result<Vec<LinkRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut links: Vec<LinkRecord> = tables
            .links
            .iter()
            .filter(|l| l.user_email == email && category.is_none_or(|c| l.category == c))
            .cloned()
            .collect();
        // newest first; equal timestamps keep the later insert first
        links.reverse();
        links.sort_by_key(|l| Reverse(l.created_at));
        Ok(links)
    }

    async fn insert_link(&self, link: &LinkRecord) -> Result<(), StoreError> {
        self.tables.write().await.links.push(link.clone());
        Ok(())
    }

    async fn delete_link(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.links, |l| l.id == id))
    }

    async fn list_tasks(&self, email: &str) -> Result<Vec<TaskRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<TaskRecord> = tables.tasks.iter().filter(|t| t.user_email == email).cloned().collect();
        tasks.sort_by_key(|t| t.order);
        Ok(tasks)
    }

    async fn count_tasks(&self, email: &str) -> Result<i64, StoreError> {
        let tables = self.tables.read().await;
        let count = tables.tasks.iter().filter(|t| t.user_email == email).count();
        i64::try_from(count).map_err(|_| StoreError::Corrupt(format!("task count {count} overflows i64")))
    }

    async fn insert_task(&self, task: &TaskRecord) -> Result<(), StoreError> {
        self.tables.write().await.tasks.push(task.clone());
        Ok(())
    }

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        changes.apply(task);
        Ok(true)
    }

    async fn reorder_tasks(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        for (index, id) in ids.iter().enumerate() {
            let order = i32::try_from(index).map_err(|_| StoreError::Corrupt(format!("task index {index} overflows")))?;
            if let Some(task) = tables.tasks.iter_mut().find(|t| t.id == *id) {
                task.order = order;
            }
        }
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(remove_where(&mut tables.tasks, |t| t.id == id))
    }
}
