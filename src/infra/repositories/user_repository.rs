//! Read side of user persistence, backed by the connection pool.
//!
//! Writes go through [`crate::infra::TxUserRepository`] so that every
//! mutation runs inside a transaction.

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder, SqlErr};

use super::entities::user::{self, Entity as UserEntity};
use crate::types::PaginationParams;
use common::{AppError, AppResult};
use domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Query methods only see active users unless the name says otherwise.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find active user by ID
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Find user by ID including soft-deleted
    async fn find_by_id_with_inactive(&self, id: i32) -> AppResult<Option<User>>;

    /// Find active user by email address (normalized before matching)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// One page of active users, newest first, with the total match count.
    async fn list(
        &self,
        params: PaginationParams,
        search: Option<String>,
    ) -> AppResult<(Vec<User>, u64)>;

    /// Number of rows in the table, soft-deleted included
    async fn count_all(&self) -> AppResult<u64>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_active_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_id_with_inactive(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_active_by_email(email)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn list(
        &self,
        params: PaginationParams,
        search: Option<String>,
    ) -> AppResult<(Vec<User>, u64)> {
        let mut query = UserEntity::find_active();
        if let Some(term) = search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            query = user::matching(query, term);
        }

        let paginator = query
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .paginate(&self.db, params.per_page);

        let total = paginator.num_items().await?;
        let models = match params.offset() {
            Some(offset) if offset < total => paginator.fetch_page(params.page_index()).await?,
            _ => Vec::new(),
        };

        Ok((models.into_iter().map(User::from).collect(), total))
    }

    async fn count_all(&self) -> AppResult<u64> {
        UserEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }
}

/// Translate a failed write: unique violations become `Conflict`.
pub(crate) fn write_error(err: DbErr, email: Option<&str>) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::warn!(%detail, "Unique constraint violated on write");
            match email {
                Some(email) => AppError::conflict(format!("Email {} is already in use", email)),
                None => AppError::conflict("Email is already in use"),
            }
        }
        _ => AppError::Database(err),
    }
}
