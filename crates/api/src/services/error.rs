//! Use-case error types.

use thiserror::Error;

use accounts_core::{EntityId, EntityKind};

use crate::db::RepositoryError;

/// Errors returned by the account use cases.
///
/// The `Display` output of every variant except [`Repository`](Self::Repository)
/// is the client-facing message.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No record with this ID. The ID is kept as received.
    #[error("{kind} with ID '{id}' not found")]
    NotFound { kind: EntityKind, id: String },

    /// No record with this email.
    #[error("{kind} with email '{email}' not found")]
    EmailNotFound { kind: EntityKind, email: String },

    /// Email already registered for this kind.
    #[error("{kind} with email '{email}' already exists")]
    EmailAlreadyExists { kind: EntityKind, email: String },

    #[error("{kind} with ID '{id}' is already active")]
    AlreadyActive { kind: EntityKind, id: EntityId },

    #[error("{kind} with ID '{id}' is already inactive")]
    AlreadyInactive { kind: EntityKind, id: EntityId },

    /// Search query shorter than the minimum after trimming.
    #[error("Search query '{0}' is invalid. Query must be at least 2 characters long.")]
    InvalidSearchQuery(String),

    /// Request fields failed validation.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub(crate) fn not_found(kind: EntityKind, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}
