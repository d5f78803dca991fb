//! Settings routes.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::json;

use crate::routes::reply::{ApiResult, body, settings_failure, success};
use crate::services::settings::{self, ThemeInput};
use crate::state::AppState;

/// `PUT /api/settings/theme`
pub async fn set_theme(State(state): State<AppState>, payload: Result<Json<ThemeInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    let theme = settings::set_theme(state.store.as_ref(), input).await.map_err(settings_failure)?;
    Ok(success(json!({ "theme": theme })))
}
