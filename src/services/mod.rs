//! Application services layer - Use cases and business logic.
//!
//! Services depend on the [`crate::infra::UnitOfWork`] abstraction for
//! repository access and transaction management.

mod user_service;

pub use user_service::{UserManager, UserService};
