//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (PostgreSQL store)
//! - `ACCOUNTS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ACCOUNTS_HOST` - Bind address (default: 127.0.0.1)
//! - `ACCOUNTS_PORT` - Listen port (default: 3000)
//! - `ACCOUNTS_STORE` - `postgres` (default) or `memory`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)
//! - `SMTP_HOST` - Enables SMTP delivery of account emails when set
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SMTP_USERNAME` / `SMTP_PASSWORD` - SMTP credentials
//! - `EMAIL_FROM` - Sender address (default: no-reply@localhost)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which entity store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("unknown store '{other}' (expected postgres or memory)")),
        }
    }
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Entity store backend
    pub store: StoreBackend,
    /// `PostgreSQL` database connection URL (contains password); `None` for the memory store
    pub database_url: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
    /// SMTP settings; account emails are only logged when absent
    pub email: Option<EmailConfig>,
}

/// SMTP configuration for the account mailer.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("ACCOUNTS_HOST", "127.0.0.1")?;
        let port = parse_env("ACCOUNTS_PORT", "3000")?;
        let store = parse_env("ACCOUNTS_STORE", "postgres")?;

        let database_url = match store {
            StoreBackend::Postgres => Some(get_database_url("ACCOUNTS_DATABASE_URL")?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            host,
            port,
            store,
            database_url,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
            email: EmailConfig::from_env()?,
        })
    }

    /// Configuration for an in-memory server, used by tests and demos.
    #[must_use]
    pub fn in_memory(host: IpAddr, port: u16) -> Self {
        Self {
            host,
            port,
            store: StoreBackend::Memory,
            database_url: None,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
            email: None,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_env("SMTP_PORT", "587")?,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: SecretString::from(get_required_env("SMTP_PASSWORD")?),
            from_address: get_env_or_default("EMAIL_FROM", "no-reply@localhost"),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_store_backend_parse() {
        assert_eq!(
            "postgres".parse::<StoreBackend>().unwrap(),
            StoreBackend::Postgres
        );
        assert_eq!(
            " Memory ".parse::<StoreBackend>().unwrap(),
            StoreBackend::Memory
        );
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_parse_value_reports_key() {
        let err = parse_value::<u16>("ACCOUNTS_PORT", "not-a-port").unwrap_err();
        match err {
            ConfigError::InvalidEnvVar(key, _) => assert_eq!(key, "ACCOUNTS_PORT"),
            other @ ConfigError::MissingEnvVar(_) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig::in_memory("127.0.0.1".parse().unwrap(), 3000);

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("hunter2-but-longer"),
            from_address: "no-reply@example.com".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2-but-longer"));
    }
}
