//! Application configuration module
//!
//! Handles environment variables, runtime profiles and application-wide constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, Environment};
