//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `seed` - Insert sample users into an empty database

pub mod args;

pub use args::{Cli, Commands};
