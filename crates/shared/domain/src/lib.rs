//! Domain layer - Core business entities and validation rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The HTTP and persistence layers both build on the types defined here.

pub mod constants;
pub mod user;
pub mod validation;

pub use constants::*;
pub use user::{DeleteMode, NewUser, User, UserPatch};
pub use validation::FieldErrors;
