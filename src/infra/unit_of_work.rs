//! Unit of Work pattern implementation.
//!
//! The Unit of Work:
//! - Centralizes access to the user repositories
//! - Manages database transactions (begin, commit, rollback)
//! - Runs every mutation atomically

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ActiveModelTrait, ActiveValue::Unchanged, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, DatabaseTransaction, EntityTrait, IsolationLevel, Set, Statement,
    TransactionTrait,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use super::repositories::entities::user::{ActiveModel, Entity as UserEntity};
use super::repositories::{write_error, UserRepository, UserStore};
use common::{AppError, AppResult};
use domain::validation::fold_name;
use domain::{NewUser, User, UserPatch};

/// A write that touches no rows. Running it first makes SQLite acquire the
/// RESERVED lock, waiting on the busy timeout instead of failing mid-transaction.
const SQLITE_RESERVE_WRITE_LOCK: &str = "UPDATE users SET id = id WHERE 1 = 0";

/// Boxed future returned by a transactional closure.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to its generic method.
/// Unit tests wrap a mocked [`UserRepository`] instead.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Get the pool-backed user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Execute a closure within a transaction.
    ///
    /// Committed when the closure returns `Ok`, rolled back otherwise.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Transaction context providing repository access within a transaction.
///
/// The pool-backed repository must not be used while a context is alive:
/// with a single-connection pool that would wait on the open transaction forever.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Get user repository for this transaction
    pub fn users(&self) -> TxUserRepository<'_> {
        TxUserRepository::new(self.txn)
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    user_repo: Arc<UserStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        let user_repo = Arc::new(UserStore::new(db.clone()));
        Self { db, user_repo }
    }

    /// READ COMMITTED on PostgreSQL.
    ///
    /// On SQLite the write lock is taken before the first read. A deferred
    /// transaction that reads and then writes cannot upgrade its lock while
    /// another writer is pending, and fails with SQLITE_BUSY without waiting.
    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        let txn = match self.db.get_database_backend() {
            DatabaseBackend::Postgres => {
                self.db
                    .begin_with_config(
                        Some(IsolationLevel::ReadCommitted),
                        Some(AccessMode::ReadWrite),
                    )
                    .await?
            }
            DatabaseBackend::Sqlite => {
                let txn = self.db.begin().await?;
                txn.execute(Statement::from_string(
                    DatabaseBackend::Sqlite,
                    SQLITE_RESERVE_WRITE_LOCK.to_string(),
                ))
                .await?;
                txn
            }
            _ => self.db.begin().await?,
        };
        Ok(txn)
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let txn = self.begin().await?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(|e| write_error(e, None))?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                tracing::debug!(code = e.code(), "Transaction rolled back");
                Err(e)
            }
        }
    }
}

/// Transaction-aware user repository.
///
/// Lookups exclude soft-deleted rows. Writes surface unique violations
/// as `Conflict`.
pub struct TxUserRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUserRepository<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    /// Find active user by ID
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        let result = UserEntity::find_active_by_id(id)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Find active user by email
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find_active_by_email(email)
            .one(self.txn)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    /// Insert an active user. Expects normalized input.
    pub async fn insert(&self, new_user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let email = new_user.email;
        let active_model = ActiveModel {
            name_lower: Set(fold_name(&new_user.name)),
            name: Set(new_user.name),
            email: Set(email.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            is_active: Set(true),
            ..Default::default()
        };

        let model = active_model
            .insert(self.txn)
            .await
            .map_err(|e| write_error(e, Some(&email)))?;

        Ok(User::from(model))
    }

    /// Apply the present fields of a patch and refresh `updated_at`.
    pub async fn update(&self, id: i32, patch: UserPatch) -> AppResult<User> {
        let mut active = ActiveModel {
            id: Unchanged(id),
            ..Default::default()
        };

        if let Some(name) = patch.name {
            active.name_lower = Set(fold_name(&name));
            active.name = Set(name);
        }
        if let Some(email) = patch.email.clone() {
            active.email = Set(email);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active
            .update(self.txn)
            .await
            .map_err(|e| write_error(e, patch.email.as_deref()))?;

        Ok(User::from(model))
    }

    /// Soft delete: flag the row inactive
    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        let active = ActiveModel {
            id: Unchanged(id),
            is_active: Set(false),
            updated_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        active.update(self.txn).await.map_err(AppError::from)?;
        Ok(())
    }

    /// Permanently delete user from database (hard delete)
    pub async fn hard_delete(&self, id: i32) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(self.txn)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(format!("User with ID {} not found", id)));
        }

        Ok(())
    }
}

/// Simpler API for executing transactional operations.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
