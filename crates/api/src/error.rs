//! Unified error handling with Sentry integration.
//!
//! Handlers return `Result<T, AppError>`. Domain errors map to specific
//! status codes with their own message; everything else is captured to
//! Sentry and answered with a generic 500.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::ServiceError;

/// Application-level error type for the accounts API.
#[derive(Debug, Error)]
pub enum AppError {
    /// A use case failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Bad request from client (malformed body or query string).
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Service(err) => match err {
                ServiceError::NotFound { .. } | ServiceError::EmailNotFound { .. } => {
                    StatusCode::NOT_FOUND
                }
                ServiceError::EmailAlreadyExists { .. } => StatusCode::CONFLICT,
                ServiceError::AlreadyActive { .. }
                | ServiceError::AlreadyInactive { .. }
                | ServiceError::InvalidSearchQuery(_)
                | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            status_code: status.as_u16(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use accounts_core::{EntityId, EntityKind};
    use axum::body::to_bytes;

    use super::*;
    use crate::db::RepositoryError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let kind = EntityKind::Customer;
        let id = EntityId::new();

        let cases = [
            (
                AppError::from(ServiceError::not_found(kind, id)),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(ServiceError::EmailNotFound {
                    kind,
                    email: "a@b.com".to_string(),
                }),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::from(ServiceError::EmailAlreadyExists {
                    kind,
                    email: "a@b.com".to_string(),
                }),
                StatusCode::CONFLICT,
            ),
            (
                AppError::from(ServiceError::AlreadyActive { kind, id }),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ServiceError::InvalidSearchQuery("a".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::from(ServiceError::Repository(RepositoryError::NotFound)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_domain_error_body() {
        let err = AppError::from(ServiceError::EmailAlreadyExists {
            kind: EntityKind::Customer,
            email: "a@b.com".to_string(),
        });

        let json = body_json(err.into_response()).await;

        assert_eq!(json["statusCode"], 409);
        assert_eq!(
            json["message"],
            "Customer with email 'a@b.com' already exists"
        );
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let err = AppError::from(ServiceError::Repository(RepositoryError::DataCorruption(
            "bad row".to_string(),
        )));

        let json = body_json(err.into_response()).await;

        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], "Internal server error");
    }
}
