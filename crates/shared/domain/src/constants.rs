//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length (after trimming)
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum name length (after trimming)
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum email length (after trimming)
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Email domains that hand out throwaway addresses
pub const DISPOSABLE_EMAIL_DOMAINS: &[&str] = &[
    "tempmail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "maildrop.cc",
];

/// Check if an email domain is on the disposable denylist
pub fn is_disposable_domain(domain: &str) -> bool {
    DISPOSABLE_EMAIL_DOMAINS.contains(&domain.to_lowercase().as_str())
}

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;
