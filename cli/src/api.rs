//! Typed HTTP client for the organizer API.
//!
//! DESIGN
//! ======
//! `ApiClient::request` is the single place that talks HTTP: it attaches
//! headers, sends JSON, and turns a `{success:false,message}` envelope into
//! `ApiError::Server`. The board/note calls the desk needs sit behind the
//! `BoardApi` trait so the outbox and desk can run against a mock.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(test)]
#[path = "api_helpers_test.rs"]
pub(crate) mod test_helpers;

use async_trait::async_trait;
use canvas::doc::{Board, BoardId, Note, NoteDraft, NoteId, NotePatch};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether repeating the same request could succeed. Client errors (4xx)
    /// and malformed responses are permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Server { status, .. } => *status >= 500,
            Self::MissingField(_) | Self::InvalidJson(_) => false,
        }
    }
}

/// Board and note operations used by the desk and the outbox.
#[async_trait]
pub trait BoardApi: Send + Sync {
    async fn list_boards(&self, user_email: &str) -> Result<Vec<Board>, ApiError>;
    async fn create_board(&self, user_email: &str, name: &str) -> Result<Board, ApiError>;
    async fn delete_board(&self, id: BoardId) -> Result<(), ApiError>;
    async fn fetch_notes(&self, board_id: BoardId) -> Result<Vec<Note>, ApiError>;
    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError>;
    async fn update_note(&self, id: NoteId, fields: &NotePatch) -> Result<(), ApiError>;
    async fn delete_note(&self, id: NoteId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// Pull `field` out of a success envelope and decode it.
pub(crate) fn envelope_field<T: DeserializeOwned>(mut body: Value, field: &'static str) -> Result<T, ApiError> {
    let value = body.get_mut(field).map(Value::take).ok_or(ApiError::MissingField(field))?;
    Ok(serde_json::from_value(value)?)
}

/// Message of a failure envelope, or a fallback naming the status.
pub(crate) fn failure_message(body: &Value, status: u16) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map_or_else(|| format!("HTTP {status}"), str::to_owned)
}

impl ApiClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and return the decoded JSON body.
    ///
    /// # Errors
    ///
    /// `Server` for non-2xx responses, `Http` for transport failures.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        headers: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        self.request_with_query(method, path, &[], headers, body).await
    }

    /// Like [`ApiClient::request`], with `query` pairs URL-encoded onto the path.
    ///
    /// # Errors
    ///
    /// `Server` for non-2xx responses, `Http` for transport failures.
    pub async fn request_with_query(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        headers: &[(&'static str, String)],
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let mut req = self.http.request(method, format!("{}{path}", self.base_url));
        if !query.is_empty() {
            req = req.query(query);
        }
        for (name, value) in headers {
            req = req.header(*name, value);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value = if text.trim().is_empty() { Value::Null } else { serde_json::from_str(&text)? };
        if !status.is_success() {
            return Err(ApiError::Server { status: status.as_u16(), message: failure_message(&value, status.as_u16()) });
        }
        Ok(value)
    }

    /// `GET /healthz`.
    ///
    /// # Errors
    ///
    /// Fails if the server is unreachable or unhealthy.
    pub async fn health(&self) -> Result<(), ApiError> {
        let response = self.http.get(format!("{}/healthz", self.base_url)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Server { status: status.as_u16(), message: "health check failed".to_owned() });
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `Server` with the server's message on validation or duplicate email.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let body = json!({ "name": name, "email": email, "password": password });
        let reply = self.request(Method::POST, "/api/register", &[], Some(&body)).await?;
        envelope_field(reply, "message")
    }

    /// Returns the user object (no password field).
    ///
    /// # Errors
    ///
    /// `Server` with status 401 for unknown users or wrong passwords.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let body = json!({ "email": email, "password": password });
        let reply = self.request(Method::POST, "/api/login", &[], Some(&body)).await?;
        envelope_field(reply, "user")
    }

    /// Links newest first, optionally limited to one category.
    ///
    /// # Errors
    ///
    /// `Server` with status 400 for an unknown category.
    pub async fn list_links(&self, user_email: &str, category: Option<&str>) -> Result<Value, ApiError> {
        let query: Vec<(&str, &str)> = category.map(|c| ("category", c)).into_iter().collect();
        self.request_with_query(Method::GET, "/api/links", &query, &[("user-email", user_email.to_owned())], None).await
    }
}

#[async_trait]
impl BoardApi for ApiClient {
    async fn list_boards(&self, user_email: &str) -> Result<Vec<Board>, ApiError> {
        let reply = self.request(Method::GET, "/api/boards", &[("user-email", user_email.to_owned())], None).await?;
        Ok(serde_json::from_value(reply)?)
    }

    async fn create_board(&self, user_email: &str, name: &str) -> Result<Board, ApiError> {
        let body = json!({ "userEmail": user_email, "name": name });
        let reply = self.request(Method::POST, "/api/boards", &[], Some(&body)).await?;
        envelope_field(reply, "board")
    }

    async fn delete_board(&self, id: BoardId) -> Result<(), ApiError> {
        self.request(Method::DELETE, &format!("/api/boards/{id}"), &[], None).await?;
        Ok(())
    }

    async fn fetch_notes(&self, board_id: BoardId) -> Result<Vec<Note>, ApiError> {
        let reply = self.request(Method::GET, "/api/notes", &[("board-id", board_id.to_string())], None).await?;
        Ok(serde_json::from_value(reply)?)
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let body = serde_json::to_value(draft)?;
        let reply = self.request(Method::POST, "/api/notes", &[], Some(&body)).await?;
        envelope_field(reply, "note")
    }

    async fn update_note(&self, id: NoteId, fields: &NotePatch) -> Result<(), ApiError> {
        let body = serde_json::to_value(fields)?;
        self.request(Method::PUT, &format!("/api/notes/{id}"), &[], Some(&body)).await?;
        Ok(())
    }

    async fn delete_note(&self, id: NoteId) -> Result<(), ApiError> {
        self.request(Method::DELETE, &format!("/api/notes/{id}"), &[], None).await?;
        Ok(())
    }
}
