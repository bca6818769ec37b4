//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validation::{normalize_email, normalize_name};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct User {
    /// Unique user identifier (assigned by storage)
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i32,
    /// Display name
    #[cfg_attr(feature = "openapi", schema(example = "Ann Lee"))]
    pub name: String,
    /// Lowercased email address
    #[cfg_attr(feature = "openapi", schema(example = "ann@example.com"))]
    pub email: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
    /// False once the user has been soft deleted
    pub is_active: bool,
}

/// Data required to register a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Trim the name, trim and lowercase the email.
    pub fn normalized(self) -> Self {
        Self {
            name: normalize_name(&self.name),
            email: normalize_email(&self.email),
        }
    }
}

/// Partial update of a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    /// True when the patch would not change anything
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Normalize every present field.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.as_deref().map(normalize_name),
            email: self.email.as_deref().map(normalize_email),
        }
    }
}

/// How a user is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    /// Mark inactive, keep the row
    #[default]
    Soft,
    /// Remove the row permanently
    Hard,
}

impl DeleteMode {
    pub fn from_soft_flag(soft: bool) -> Self {
        if soft {
            DeleteMode::Soft
        } else {
            DeleteMode::Hard
        }
    }
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteMode::Soft => write!(f, "soft"),
            DeleteMode::Hard => write!(f, "hard"),
        }
    }
}
