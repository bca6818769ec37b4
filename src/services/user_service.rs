//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::infra::UnitOfWork;
use crate::types::{PaginationMeta, PaginationParams};
use common::{AppError, AppResult, OptionExt};
use domain::{DeleteMode, NewUser, User, UserPatch};

fn user_not_found(id: i32) -> String {
    format!("User with ID {} not found", id)
}

/// User service trait for dependency injection.
///
/// Every operation ignores soft-deleted users.
#[async_trait]
pub trait UserService: Send + Sync {
    /// One page of active users matching an optional search term, newest first.
    async fn list_users(
        &self,
        params: PaginationParams,
        search: Option<String>,
    ) -> AppResult<(Vec<User>, PaginationMeta)>;

    /// Get active user by ID
    async fn get_user(&self, id: i32) -> AppResult<User>;

    /// Register a user; the email must not belong to another active user.
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// Apply a partial update to an active user.
    async fn update_user(&self, id: i32, patch: UserPatch) -> AppResult<User>;

    /// Soft or hard delete an active user.
    async fn delete_user(&self, id: i32, mode: DeleteMode) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    #[instrument(skip(self))]
    async fn list_users(
        &self,
        params: PaginationParams,
        search: Option<String>,
    ) -> AppResult<(Vec<User>, PaginationMeta)> {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (users, total) = self.uow.users().list(params, search).await?;
        debug!(returned = users.len(), total, "Listed users");

        Ok((users, PaginationMeta::new(params, total)))
    }

    #[instrument(skip(self))]
    async fn get_user(&self, id: i32) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found(|| user_not_found(id))
    }

    #[instrument(skip(self, new_user))]
    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let new_user = new_user.normalized();

        let user = crate::with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            if users.find_by_email(&new_user.email).await?.is_some() {
                return Err(AppError::conflict(format!(
                    "User with email {} already exists",
                    new_user.email
                )));
            }
            users.insert(new_user).await
        })?;

        info!(user_id = user.id, "User created");
        Ok(user)
    }

    #[instrument(skip(self, patch))]
    async fn update_user(&self, id: i32, patch: UserPatch) -> AppResult<User> {
        let patch = patch.normalized();

        let user = crate::with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let current = users
                .find_by_id(id)
                .await?
                .ok_or_not_found(|| user_not_found(id))?;

            if let Some(email) = patch.email.as_deref() {
                if email != current.email {
                    if let Some(other) = users.find_by_email(email).await? {
                        if other.id != current.id {
                            return Err(AppError::conflict(format!(
                                "Email {} is already in use by another user",
                                email
                            )));
                        }
                    }
                }
            }

            users.update(current.id, patch).await
        })?;

        info!(user_id = user.id, "User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: i32, mode: DeleteMode) -> AppResult<()> {
        crate::with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            let current = users
                .find_by_id(id)
                .await?
                .ok_or_not_found(|| user_not_found(id))?;

            match mode {
                DeleteMode::Soft => users.deactivate(current.id).await,
                DeleteMode::Hard => users.hard_delete(current.id).await,
            }
        })?;

        info!(user_id = id, %mode, "User deleted");
        Ok(())
    }
}
