//! Application settings loaded from environment variables.

use std::env;
use std::fmt;

use common::{CorsConfig, DatabaseConfig, ServerConfig};

use super::constants::{
    CORS_MAX_AGE_SECONDS, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, TESTING_DATABASE_URL,
};

/// Runtime profile selected with `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse a profile name, falling back to development for unknown values.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            "development" | "dev" => Environment::Development,
            other => {
                tracing::warn!(value = other, "Unknown APP_ENV, using development");
                Environment::Development
            }
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn is_testing(&self) -> bool {
        matches!(self, Environment::Testing)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
            Environment::Testing => write!(f, "testing"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    /// `Debug` output of this field redacts the URL
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let environment = env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        Self::for_environment(environment)
    }

    /// Build the configuration for a profile, honouring environment overrides.
    pub fn for_environment(environment: Environment) -> Self {
        let database = if environment.is_testing() {
            // Every pooled connection to `sqlite::memory:` would open its own database.
            DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| TESTING_DATABASE_URL.to_string()),
                max_connections: 1,
                min_connections: 1,
                log_queries: env_flag("DATABASE_ECHO").unwrap_or(false),
            }
        } else {
            DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(DEFAULT_MAX_CONNECTIONS),
                min_connections: env_parse("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(DEFAULT_MIN_CONNECTIONS),
                log_queries: env_flag("DATABASE_ECHO")
                    .unwrap_or_else(|| environment.is_development()),
            }
        };

        let cors = CorsConfig {
            allowed_origins: env::var("CORS_ORIGINS")
                .map(|raw| CorsConfig::parse_origins(&raw))
                .unwrap_or_else(|_| CorsConfig::default().allowed_origins),
            max_age_seconds: CORS_MAX_AGE_SECONDS,
        };

        Self {
            environment,
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
                port: env_parse("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            },
            database,
            cors,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Accepts the usual truthy/falsy spellings.
fn env_flag(key: &str) -> Option<bool> {
    let raw = env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
