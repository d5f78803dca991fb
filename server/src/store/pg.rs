//! Postgres `Store` over an sqlx pool.
//!
//! Note heights are stored as a nullable double; `NULL` means `auto`.
//! Enumerations (note kind, theme, link category) are stored as text and
//! decoded back through their `parse` helpers.

#[cfg(all(test, feature = "live-db-tests"))]
#[path = "pg_test.rs"]
mod pg_test;

use async_trait::async_trait;
use canvas::doc::{NoteHeight, NoteKind, NotePatch};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{
    BoardRecord, LinkCategory, LinkRecord, NoteRecord, Store, StoreError, TaskChanges, TaskRecord, Theme, UserRecord,
};

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// =============================================================================
// ROW DECODING
// =============================================================================

fn note_kind_str(kind: NoteKind) -> &'static str {
    match kind {
        NoteKind::Text => "text",
        NoteKind::Plaintext => "plaintext",
        NoteKind::Image => "image",
    }
}

fn parse_note_kind(raw: &str) -> Result<NoteKind, StoreError> {
    match raw {
        "text" => Ok(NoteKind::Text),
        "plaintext" => Ok(NoteKind::Plaintext),
        "image" => Ok(NoteKind::Image),
        other => Err(StoreError::Corrupt(format!("unknown note kind {other:?}"))),
    }
}

fn height_column(height: NoteHeight) -> Option<f64> {
    match height {
        NoteHeight::Fixed(h) => Some(h),
        NoteHeight::Auto => None,
    }
}

fn user_from_row(row: &PgRow) -> Result<UserRecord, StoreError> {
    let theme: String = row.try_get("theme")?;
    Ok(UserRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        theme: Theme::parse(&theme).ok_or_else(|| StoreError::Corrupt(format!("unknown theme {theme:?}")))?,
        created_at: row.try_get("created_at")?,
    })
}

fn board_from_row(row: &PgRow) -> Result<BoardRecord, StoreError> {
    Ok(BoardRecord {
        id: row.try_get("id")?,
        user_email: row.try_get("user_email")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn note_from_row(row: &PgRow) -> Result<NoteRecord, StoreError> {
    let kind: String = row.try_get("kind")?;
    let height: Option<f64> = row.try_get("height")?;
    Ok(NoteRecord {
        id: row.try_get("id")?,
        board_id: row.try_get("board_id")?,
        kind: parse_note_kind(&kind)?,
        content: row.try_get("content")?,
        color: row.try_get("color")?,
        width: row.try_get("width")?,
        height: height.map_or(NoteHeight::Auto, NoteHeight::Fixed),
        x: row.try_get("x")?,
        y: row.try_get("y")?,
        z_index: row.try_get("z_index")?,
        created_at: row.try_get("created_at")?,
    })
}

fn link_from_row(row: &PgRow) -> Result<LinkRecord, StoreError> {
    let category: String = row.try_get("category")?;
    Ok(LinkRecord {
        id: row.try_get("id")?,
        user_email: row.try_get("user_email")?,
        title: row.try_get("title")?,
        url: row.try_get("url")?,
        category: LinkCategory::parse(&category)
            .ok_or_else(|| StoreError::Corrupt(format!("unknown link category {category:?}")))?,
        created_at: row.try_get("created_at")?,
    })
}

fn task_from_row(row: &PgRow) -> Result<TaskRecord, StoreError> {
    Ok(TaskRecord {
        id: row.try_get("id")?,
        user_email: row.try_get("user_email")?,
        content: row.try_get("content")?,
        is_completed: row.try_get("is_completed")?,
        order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}

// =============================================================================
// STORE
// =============================================================================

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query("SELECT id, name, email, password_hash, theme, created_at FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, user: &UserRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, theme, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.theme.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Duplicate("email")),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_theme(&self, email: &str, theme: Theme) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET theme = $2 WHERE email = $1")
            .bind(email)
            .bind(theme.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_boards(&self, email: &str) -> Result<Vec<BoardRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_email, name, created_at FROM boards WHERE user_email = $1 ORDER BY created_at ASC, seq ASC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(board_from_row).collect()
    }

    async fn insert_board(&self, board: &BoardRecord) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO boards (id, user_email, name, created_at) VALUES ($1, $2, $3, $4)")
            .bind(board.id)
            .bind(&board.user_email)
            .bind(&board.name)
            .bind(board.created_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ensure_board(&self, board: &BoardRecord) -> Result<Vec<BoardRecord>, StoreError> {
        let mut tx = self.pool.begin().await?;
        // serialize concurrent first fetches for the same owner
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&board.user_email)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO boards (id, user_email, name, created_at)
             SELECT $1, $2, $3, $4
             WHERE NOT EXISTS (SELECT 1 FROM boards WHERE user_email = $2)",
        )
        .bind(board.id)
        .bind(&board.user_email)
        .bind(&board.name)
        .bind(board.created_at)
        .execute(&mut *tx)
        .await?;
        let rows = sqlx::query(
            "SELECT id, user_email, name, created_at FROM boards WHERE user_email = $1 ORDER BY created_at ASC, seq ASC",
        )
        .bind(&board.user_email)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        rows.iter().map(board_from_row).collect()
    }

    async fn delete_board_cascade(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM notes WHERE board_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_notes(&self, board_id: Uuid) -> Result<Vec<NoteRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, board_id, kind, content, color, width, height, x, y, z_index, created_at
             FROM notes WHERE board_id = $1 ORDER BY seq ASC",
        )
        .bind(board_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(note_from_row).collect()
    }

    async fn insert_note(&self, note: &NoteRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO notes (id, board_id, kind, content, color, width, height, x, y, z_index, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(note.id)
        .bind(note.board_id)
        .bind(note_kind_str(note.kind))
        .bind(&note.content)
        .bind(&note.color)
        .bind(note.width)
        .bind(height_column(note.height))
        .bind(note.x)
        .bind(note.y)
        .bind(note.z_index)
        .bind(note.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_note(&self, id: Uuid, patch: &NotePatch) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE notes SET
                x = COALESCE($2, x),
                y = COALESCE($3, y),
                width = COALESCE($4, width),
                height = CASE WHEN $5 THEN $6 ELSE height END,
                z_index = COALESCE($7, z_index),
                content = COALESCE($8, content),
                color = COALESCE($9, color)
             WHERE id = $1",
        )
        .bind(id)
        .bind(patch.x)
        .bind(patch.y)
        .bind(patch.width)
        .bind(patch.height.is_some())
        .bind(patch.height.and_then(height_column))
        .bind(patch.z_index)
        .bind(patch.content.as_deref())
        .bind(patch.color.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_note(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_links(&self, email: &str, category: Option<LinkCategory>) -> Result<Vec<LinkRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_email, title, url, category, created_at FROM links
             WHERE user_email = $1 AND ($2::TEXT IS NULL OR category = $2)
             ORDER BY created_at DESC, seq DESC",
        )
        .bind(email)
        .bind(category.map(LinkCategory::as_str))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(link_from_row).collect()
    }

    async fn insert_link(&self, link: &LinkRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO links (id, user_email, title, url, category, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(link.id)
        .bind(&link.user_email)
        .bind(&link.title)
        .bind(&link.url)
        .bind(link.category.as_str())
        .bind(link.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_link(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, email: &str) -> Result<Vec<TaskRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, user_email, content, is_completed, sort_order, created_at FROM todos
             WHERE user_email = $1 ORDER BY sort_order ASC, seq ASC",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(task_from_row).collect()
    }

    async fn count_tasks(&self, email: &str) -> Result<i64, StoreError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM todos WHERE user_email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert_task(&self, task: &TaskRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO todos (id, user_email, content, is_completed, sort_order, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(task.id)
        .bind(&task.user_email)
        .bind(&task.content)
        .bind(task.is_completed)
        .bind(task.order)
        .bind(task.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_task(&self, id: Uuid, changes: &TaskChanges) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE todos SET is_completed = COALESCE($2, is_completed), content = COALESCE($3, content) WHERE id = $1",
        )
        .bind(id)
        .bind(changes.is_completed)
        .bind(changes.content.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn reorder_tasks(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        // WITH ORDINALITY is 1-based
        sqlx::query(
            "UPDATE todos SET sort_order = ordered.idx - 1
             FROM UNNEST($1::UUID[]) WITH ORDINALITY AS ordered(id, idx)
             WHERE todos.id = ordered.id",
        )
        .bind(ids)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
