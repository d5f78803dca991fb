//! Link collection service.

#[cfg(test)]
#[path = "link_test.rs"]
mod link_test;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::store::{self, LinkCategory, LinkRecord, Store, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkInput {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    /// Absent or empty means `Other`.
    pub category: Option<String>,
}

/// Parse an optional category name. Empty strings count as absent.
///
/// # Errors
///
/// `Invalid` for a name outside the four known categories.
pub fn parse_category(raw: Option<&str>) -> Result<Option<LinkCategory>, LinkError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(name) => LinkCategory::parse(name).map(Some).ok_or(LinkError::Invalid("Unknown link category.")),
    }
}

/// Links of a user, newest first, optionally filtered by category.
///
/// # Errors
///
/// `Invalid` for a blank email or unknown category.
pub async fn list_links(store: &dyn Store, email: &str, category: Option<&str>) -> Result<Vec<LinkRecord>, LinkError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(LinkError::Invalid("User email is required."));
    }
    let category = parse_category(category)?;
    Ok(store.list_links(&email, category).await?)
}

/// Save a link.
///
/// # Errors
///
/// `Invalid` if the title or url is blank, the email is blank, or the category
/// is unknown.
pub async fn create_link(store: &dyn Store, input: CreateLinkInput) -> Result<LinkRecord, LinkError> {
    let title = input.title.trim();
    let url = input.url.trim();
    if title.is_empty() || url.is_empty() {
        return Err(LinkError::Invalid("Title and URL are required."));
    }
    let user_email = input.user_email.trim().to_ascii_lowercase();
    if user_email.is_empty() {
        return Err(LinkError::Invalid("User email is required."));
    }
    let category = parse_category(input.category.as_deref())?.unwrap_or_default();

    let link = LinkRecord {
        id: Uuid::new_v4(),
        user_email,
        title: title.to_owned(),
        url: url.to_owned(),
        category,
        created_at: store::now(),
    };
    store.insert_link(&link).await?;
    info!(link_id = %link.id, category = category.as_str(), "link saved");
    Ok(link)
}

/// Delete a link. Missing links are a no-op.
///
/// # Errors
///
/// `Store` on persistence failure.
pub async fn delete_link(store: &dyn Store, id: Uuid) -> Result<(), LinkError> {
    if store.delete_link(id).await? {
        info!(link_id = %id, "link deleted");
    }
    Ok(())
}
