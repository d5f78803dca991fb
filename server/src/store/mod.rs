//! Record store: typed records and the backend-neutral `Store` trait.
//!
//! DESIGN
//! ======
//! Services never talk to a database directly. They call the async `Store`
//! trait, implemented by `PgStore` (Postgres via sqlx) and `MemoryStore`
//! (process memory, used by tests and the `memory` backend). Records are the
//! wire shapes as well: they serialize with camelCase field names and RFC 3339
//! timestamps.
//!
//! ATOMICITY
//! =========
//! `delete_board_cascade`, `ensure_board`, and `reorder_tasks` are each a
//! single unit: one transaction in Postgres, one write lock in memory.

pub mod memory;
pub mod pg;

use async_trait::async_trait;
use canvas::doc::{NoteFields, NoteHeight, NoteKind, NotePatch};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

pub use memory::MemoryStore;
pub use pg::PgStore;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate {0}")]
    Duplicate(&'static str),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// RECORDS
// =============================================================================

/// UI theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

/// Stored user. Never serialized as a whole; see `services::auth::PublicUser`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    /// Normalized lowercase; unique.
    pub email: String,
    /// `salt_hex$digest_hex`.
    pub password_hash: String,
    pub theme: Theme,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRecord {
    pub id: Uuid,
    pub user_email: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: Uuid,
    /// Not checked against existing boards.
    pub board_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    pub content: String,
    pub color: String,
    pub width: f64,
    pub height: NoteHeight,
    pub x: f64,
    pub y: f64,
    pub z_index: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl NoteRecord {
    /// Apply the present fields of a patch.
    pub fn apply(&mut self, patch: &NotePatch) {
        patch.apply_to(NoteFields {
            x: &mut self.x,
            y: &mut self.y,
            width: &mut self.width,
            height: &mut self.height,
            z_index: &mut self.z_index,
            content: &mut self.content,
            color: &mut self.color,
        });
    }
}

/// Link category. Wire names match the variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LinkCategory {
    Website,
    Video,
    Document,
    #[default]
    Other,
}

impl LinkCategory {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Website => "Website",
            Self::Video => "Video",
            Self::Document => "Document",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Website" => Some(Self::Website),
            "Video" => Some(Self::Video),
            "Document" => Some(Self::Document),
            "Other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub id: Uuid,
    pub user_email: String,
    pub title: String,
    pub url: String,
    pub category: LinkCategory,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: Uuid,
    pub user_email: String,
    pub content: String,
    pub is_completed: bool,
    pub order: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Sparse task update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChanges {
    pub is_completed: Option<bool>,
    pub content: Option<String>,
}

impl TaskChanges {
    pub fn apply(&self, task: &mut TaskRecord) {
        if let Some(done) = self.is_completed {
            task.is_completed = done;
        }
        if let Some(content) = &self.content {
            task.content.clone_from(content);
        }
    }
}

/// Current UTC time truncated to microseconds, the precision Postgres keeps.
#[must_use]
pub fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.nanosecond() / 1_000 * 1_000).unwrap_or(now)
}

// =============================================================================
// STORE
// =============================================================================

/// Persistence boundary for every record kind.
///
/// Mutations that target a missing record return `Ok(false)` rather than an error.
#[async_trait]
pub trait Store: Send + Sync {
    // --- users ---

    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Insert a user. Fails with `Duplicate` if the email is taken.
    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError>;

    async fn set_theme(&self, email: &str, theme: Theme) -> Result<bool, StoreError>;

    // --- boards ---

    /// Boards owned by `email`, oldest first.
    async fn list_boards(&self, email: &str) -> Result<Vec<BoardRecord>, StoreError>;

    async fn insert_board(&self, board: &BoardRecord) -> Result<(), StoreError>;

    /// Insert `board` only if its owner has no boards, then list the owner's boards.
    async fn ensure_board(&self, board: &BoardRecord) -> Result<Vec<BoardRecord>, StoreError>;

    /// Delete a board and every note that references it.
    async fn delete_board_cascade(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- notes ---

    /// Notes of a board in creation order.
    async fn list_notes(&self, board_id: Uuid) -> Result<Vec<NoteRecord>, StoreError>;

    async fn insert_note(&self, note: &NoteRecord) -> Result<(), StoreError>;

    async fn update_note(&self, id: Uuid, patch: &NotePatch) -> Result<bool, StoreError>;

    async fn delete_note(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- links ---

    /// Links owned by `email`, newest first, optionally restricted to one category.
    async fn list_links(&self, email: &str, category: Option<LinkCategory>) -> Result<Vec<LinkRecord>, StoreError>;

    async fn insert_link(&self, link: &LinkRecord) -> Result<(), StoreError>;

    async fn delete_link(&self, id: Uuid) -> Result<bool, StoreError>;

    // --- tasks ---

    /// Tasks owned by `email`, ascending `order`.
    async fn list_tasks(&self, email: &str) -> Result<Vec<TaskRecord>, StoreError>;

    async fn count_tasks(&self, email: &str) -> Result<i64, StoreError>;

    async fn insert_task(&self, task: &TaskRecord) -> Result<(), StoreError>;

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> Result<bool, StoreError>;

    /// Set each listed task's `order` to its index. Unknown ids are skipped.
    async fn reorder_tasks(&self, ids: &[Uuid]) -> Result<(), StoreError>;

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError>;
}
