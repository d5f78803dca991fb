//! Link collection routes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::routes::reply::{ApiFailure, ApiResult, UserEmail, body, link_failure, parse_id, success};
use crate::services::link::{self, CreateLinkInput};
use crate::state::AppState;
use crate::store::LinkRecord;

#[derive(Debug, Deserialize)]
pub struct LinkFilter {
    pub category: Option<String>,
}

/// `GET /api/links?category=`: newest first.
pub async fn list_links(
    State(state): State<AppState>,
    UserEmail(email): UserEmail,
    Query(filter): Query<LinkFilter>,
) -> Result<Json<Vec<LinkRecord>>, ApiFailure> {
    let links = link::list_links(state.store.as_ref(), &email, filter.category.as_deref())
        .await
        .map_err(link_failure)?;
    Ok(Json(links))
}

/// `POST /api/links`
pub async fn create_link(State(state): State<AppState>, payload: Result<Json<CreateLinkInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    let link = link::create_link(state.store.as_ref(), input).await.map_err(link_failure)?;
    Ok(success(json!({ "link": link })))
}

/// `DELETE /api/links/:id`
pub async fn delete_link(State(state): State<AppState>, Path(raw): Path<String>) -> ApiResult {
    let id = parse_id(&raw, "Invalid Link ID.")?;
    link::delete_link(state.store.as_ref(), id).await.map_err(link_failure)?;
    Ok(success(json!({})))
}
