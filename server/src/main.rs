mod config;
mod db;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::{ServerConfig, StoreBackend};
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside development.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let store: Arc<dyn Store> = match &config.backend {
        StoreBackend::Postgres { database_url, max_connections } => {
            match db::init_pool(database_url, *max_connections).await {
                Ok(pool) => Arc::new(PgStore::new(pool)),
                Err(e) => {
                    tracing::error!(error = %e, "database init failed");
                    std::process::exit(1);
                }
            }
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let app = routes::app(state::AppState::new(store), &config.static_dir);
    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, bind = %config.bind, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(bind = %config.bind, static_dir = %config.static_dir.display(), "organizer listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}
