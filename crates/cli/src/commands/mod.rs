//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use accounts_api::db::RepositoryError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Database URL from `ACCOUNTS_DATABASE_URL`, falling back to `DATABASE_URL`.
pub fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("ACCOUNTS_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("ACCOUNTS_DATABASE_URL"))
}
