//! Seed command - Inserts sample users into an empty database.

use std::sync::Arc;

use common::AppResult;
use domain::NewUser;

use crate::config::{Config, SAMPLE_USERS};
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{UserManager, UserService};

/// Execute the seed command
pub async fn execute(config: Config) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    let inserted = seed_if_empty(&db).await?;
    println!("Inserted {} sample users", inserted);
    Ok(())
}

/// Insert the sample users when the table has no rows at all.
///
/// Soft-deleted rows count, so a cleared development database is not refilled.
pub async fn seed_if_empty(db: &Database) -> AppResult<usize> {
    let uow = Arc::new(Persistence::new(db.get_connection()));

    let existing = uow.users().count_all().await?;
    if existing > 0 {
        tracing::debug!(existing, "Users table not empty, skipping seed");
        return Ok(0);
    }

    let service = UserManager::new(uow);
    for (name, email) in SAMPLE_USERS {
        service.create_user(NewUser::new(*name, *email)).await?;
    }

    tracing::info!(count = SAMPLE_USERS.len(), "Seeded sample users");
    Ok(SAMPLE_USERS.len())
}
