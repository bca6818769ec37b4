//! Migration: Enforce email uniqueness among active users.
//!
//! A partial index lets a soft-deleted user's email be registered again.
//! Both PostgreSQL and SQLite support `CREATE UNIQUE INDEX ... WHERE`.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::ConnectionTrait;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_users_email_active \
                 ON users (email) WHERE is_active = TRUE",
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS ux_users_email_active")
            .await?;
        Ok(())
    }
}
