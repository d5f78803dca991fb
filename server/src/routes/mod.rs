//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the JSON API under `/api` plus `/healthz`. Every
//! other path is answered from the static asset directory, which holds the
//! organizer's web UI; paths with no file behind them get a plain 404.

pub mod auth;
pub mod boards;
pub mod links;
pub mod notes;
pub mod reply;
pub mod settings;
pub mod todos;


use std::path::Path;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// JSON API routes.
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/boards", get(boards::list_boards).post(boards::create_board))
        .route("/api/boards/{id}", delete(boards::delete_board))
        .route("/api/notes", get(notes::list_notes).post(notes::create_note))
        .route("/api/notes/{id}", put(notes::update_note).delete(notes::delete_note))
        .route("/api/links", get(links::list_links).post(links::create_link))
        .route("/api/links/{id}", delete(links::delete_link))
        .route("/api/todos", get(todos::list_tasks).post(todos::create_task))
        .route("/api/todos/reorder", put(todos::reorder_tasks))
        .route("/api/todos/{id}", put(todos::update_task).delete(todos::delete_task))
        .route("/api/settings/theme", put(settings::set_theme))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Full application: API routes, static assets, and the HTTP middleware stack.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let assets = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .not_found_service(file_not_found.into_service());

    api_routes(state)
        .fallback_service(assets)
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

async fn file_not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "File not found")
}
