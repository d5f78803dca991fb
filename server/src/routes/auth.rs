//! Registration and login routes.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::json;

use crate::routes::reply::{ApiResult, auth_failure, body, success};
use crate::services::auth::{self, LoginInput, RegisterInput};
use crate::state::AppState;

/// `POST /api/register`
pub async fn register(State(state): State<AppState>, payload: Result<Json<RegisterInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    auth::register(state.store.as_ref(), input).await.map_err(auth_failure)?;
    Ok(success(json!({ "message": "User created successfully." })))
}

/// `POST /api/login`
pub async fn login(State(state): State<AppState>, payload: Result<Json<LoginInput>, JsonRejection>) -> ApiResult {
    let input = body(payload)?;
    let user = auth::login(state.store.as_ref(), input).await.map_err(auth_failure)?;
    Ok(success(json!({ "user": user })))
}
