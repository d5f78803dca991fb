//! Response envelope, request extractors, and service error mapping.
//!
//! DESIGN
//! ======
//! Every failure leaves the API as `{ "success": false, "message": ... }`
//! with a status that reflects the cause. Store failures are logged here and
//! reported with a generic message so database details never reach clients.

#[cfg(test)]
#[path = "reply_test.rs"]
mod reply_test;

use axum::Json;
use axum::extract::FromRequestParts;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tracing::error;
use uuid::Uuid;

use crate::services::auth::AuthError;
use crate::services::board::BoardError;
use crate::services::link::LinkError;
use crate::services::note::NoteError;
use crate::services::settings::SettingsError;
use crate::services::todo::TodoError;
use crate::store::StoreError;

const STORE_FAILURE_MESSAGE: &str = "Internal server error.";

// =============================================================================
// ENVELOPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: StatusCode,
    pub message: String,
}

impl ApiFailure {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into() }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "success": false, "message": self.message }))).into_response()
    }
}

pub type ApiResult = Result<Json<Value>, ApiFailure>;

/// `{ "success": true }` merged with the given fields.
pub fn success(fields: Value) -> Json<Value> {
    let mut body = json!({ "success": true });
    if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), fields) {
        body.extend(extra);
    }
    Json(body)
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Unwrap a JSON body, turning any rejection into a 400 envelope.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiFailure> {
    payload.map(|Json(value)| value).map_err(|rejection| ApiFailure::bad_request(rejection.body_text()))
}

/// Parse a path or header identifier.
pub fn parse_id(raw: &str, message: &'static str) -> Result<Uuid, ApiFailure> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiFailure::bad_request(message))
}

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<&'a str, ApiFailure> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiFailure::bad_request(format!("Missing {name} header.")))
}

/// Owner email from the `user-email` header.
pub struct UserEmail(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserEmail {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header(parts, "user-email").map(|email| Self(email.to_ascii_lowercase()))
    }
}

/// Board id from the `board-id` header.
pub struct BoardHeader(pub Uuid);

impl<S: Send + Sync> FromRequestParts<S> for BoardHeader {
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = header(parts, "board-id")?;
        parse_id(raw, "Invalid Board ID.").map(Self)
    }
}

// =============================================================================
// ERROR MAPPING
// =============================================================================

fn store_failure(err: &StoreError) -> ApiFailure {
    error!(error = %err, "store operation failed");
    ApiFailure { status: StatusCode::INTERNAL_SERVER_ERROR, message: STORE_FAILURE_MESSAGE.to_owned() }
}

pub(crate) fn auth_failure(err: AuthError) -> ApiFailure {
    let status = match &err {
        AuthError::Invalid(_) => StatusCode::BAD_REQUEST,
        AuthError::EmailTaken => StatusCode::CONFLICT,
        AuthError::UnknownUser | AuthError::WrongPassword => StatusCode::UNAUTHORIZED,
        AuthError::Hash(detail) => {
            error!(error = %detail, "password hashing failed");
            return ApiFailure {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: STORE_FAILURE_MESSAGE.to_owned(),
            };
        }
        AuthError::Store(e) => return store_failure(e),
    };
    ApiFailure { status, message: err.to_string() }
}

pub(crate) fn board_failure(err: BoardError) -> ApiFailure {
    match err {
        BoardError::Invalid(msg) => ApiFailure::bad_request(msg),
        BoardError::Store(e) => store_failure(&e),
    }
}

pub(crate) fn note_failure(err: NoteError) -> ApiFailure {
    match err {
        NoteError::Invalid(msg) => ApiFailure::bad_request(msg),
        NoteError::Store(e) => store_failure(&e),
    }
}

pub(crate) fn link_failure(err: LinkError) -> ApiFailure {
    match err {
        LinkError::Invalid(msg) => ApiFailure::bad_request(msg),
        LinkError::Store(e) => store_failure(&e),
    }
}

pub(crate) fn todo_failure(err: TodoError) -> ApiFailure {
    match err {
        TodoError::Invalid(msg) => ApiFailure::bad_request(msg),
        TodoError::Store(e) => store_failure(&e),
    }
}

pub(crate) fn settings_failure(err: SettingsError) -> ApiFailure {
    match err {
        SettingsError::Invalid(msg) => ApiFailure::bad_request(msg),
        SettingsError::Store(e) => store_failure(&e),
    }
}
