//! Application-wide constants

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

// =============================================================================
// Database
// =============================================================================

/// Default database connection URL (file backed SQLite, created on demand)
pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db?mode=rwc";

/// Database used by the `testing` profile
pub const TESTING_DATABASE_URL: &str = "sqlite::memory:";

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

// =============================================================================
// HTTP
// =============================================================================

/// Preflight cache lifetime for CORS responses
pub const CORS_MAX_AGE_SECONDS: u64 = 3600;

/// Plain-text banner served on `/`
pub const WELCOME_BANNER: &str = "Welcome to the User Registry API";

/// Message for unknown routes and malformed path ids
pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

// =============================================================================
// Seeding
// =============================================================================

/// Sample users inserted into an empty development database
pub const SAMPLE_USERS: &[(&str, &str)] = &[
    ("Иван Иванов", "ivan@example.com"),
    ("Мария Петрова", "maria@example.com"),
    ("Алексей Сидоров", "alexey@example.com"),
    ("Елена Смирнова", "elena@example.com"),
    ("Дмитрий Козлов", "dmitry@example.com"),
];
