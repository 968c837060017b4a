//! Entity store access.
//!
//! # Database: `accounts`
//!
//! ## Tables
//!
//! - `customers` - Customer records
//! - `users` - User records (same schema as `customers`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p accounts-cli -- migrate
//! ```
//!
//! # Backends
//!
//! - [`PgEntityRepository`] - `PostgreSQL`, used in production
//! - [`MemoryEntityRepository`] - process-local store for tests and demos

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use accounts_core::{Email, EntityId, EntityKind};

use crate::models::{Entity, NewEntity};

pub use memory::MemoryEntityRepository;
pub use postgres::PgEntityRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations for one entity kind.
///
/// Lookups return `Ok(None)` for missing rows; only [`save`](Self::save)
/// reports a missing row as [`RepositoryError::NotFound`].
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// The kind of entity this repository stores.
    fn kind(&self) -> EntityKind;

    /// Get an entity by ID.
    async fn find_by_id(&self, id: EntityId) -> Result<Option<Entity>, RepositoryError>;

    /// Get an entity by exact email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Entity>, RepositoryError>;

    /// All entities, newest first.
    async fn find_all(&self) -> Result<Vec<Entity>, RepositoryError>;

    /// Entities whose first name, last name, or email contains `text`
    /// (case-insensitive), newest first.
    async fn search(&self, text: &str) -> Result<Vec<Entity>, RepositoryError>;

    /// Insert a new entity, assigning ID and timestamps.
    ///
    /// Returns [`RepositoryError::Conflict`] if the email is taken.
    async fn insert(&self, new: NewEntity) -> Result<Entity, RepositoryError>;

    /// Persist the mutable fields of `entity` and refresh `updated_at`.
    async fn save(&self, entity: &Entity) -> Result<Entity, RepositoryError>;

    /// Delete an entity. Deleting a missing ID is not an error.
    async fn delete(&self, id: EntityId) -> Result<(), RepositoryError>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Escape `LIKE` wildcards so user input matches literally.
///
/// Uses backslash, `PostgreSQL`'s default `LIKE` escape character.
#[must_use]
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
