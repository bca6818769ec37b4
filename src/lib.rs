//! User Registry - CRUD service for user records over HTTP/JSON.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Environment configuration and constants
//! - **services**: User use cases (list, get, create, update, delete)
//! - **infra**: Database, migrations, repositories and Unit of Work
//! - **api**: HTTP handlers, extractors and routes
//! - **types**: Shared response and pagination types
//!
//! Domain types live in the `domain` crate, errors and shared config in `common`.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Insert sample users
//! cargo run -- seed
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use common::{AppError, AppResult};
pub use config::Config;
pub use domain::{DeleteMode, NewUser, User, UserPatch};
