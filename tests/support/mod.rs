//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use common::{CorsConfig, DatabaseConfig};
use user_registry::api::{create_router, AppState};
use user_registry::infra::{Database, Persistence};
use user_registry::services::UserManager;

/// Fresh, migrated in-memory SQLite database.
pub async fn test_database() -> Arc<Database> {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        log_queries: false,
    };
    Arc::new(
        Database::connect(&config)
            .await
            .expect("in-memory database should open"),
    )
}

/// Migrated SQLite file under `dir`, served by a pool of `max_connections`.
pub async fn file_database(dir: &Path, max_connections: u32) -> Arc<Database> {
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", dir.join("users.db").display()),
        max_connections,
        min_connections: 1,
        log_queries: false,
    };
    Arc::new(
        Database::connect(&config)
            .await
            .expect("file database should open"),
    )
}

/// Service over an already opened database.
pub fn service_for(db: &Database) -> UserManager<Persistence> {
    UserManager::new(Arc::new(Persistence::new(db.get_connection())))
}

/// Service plus its Unit of Work, for direct storage checks.
pub async fn test_service() -> (UserManager<Persistence>, Arc<Persistence>) {
    let db = test_database().await;
    let uow = Arc::new(Persistence::new(db.get_connection()));
    (UserManager::new(uow.clone()), uow)
}

/// Router over a fresh database.
pub async fn test_app() -> Router {
    let db = test_database().await;
    create_router(AppState::from_database(db), &CorsConfig::default())
}
