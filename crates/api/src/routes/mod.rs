//! HTTP routes for the accounts API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Project information page
//! GET    /health                    - Liveness
//! GET    /health/ready              - Readiness (store check)
//!
//! # Per resource: /customers and /users
//! GET    /<res>                     - List, newest first
//! GET    /<res>/search?q=           - Substring search
//! GET    /<res>/{id}                - Fetch by ID
//! GET    /<res>/email/{email}       - Fetch by email
//! POST   /<res>                     - Create (201)
//! PATCH  /<res>/{id}                - Partial update
//! DELETE /<res>/{id}                - Delete (customers 204, users 200)
//! PATCH  /<res>/{id}/confirm-email  - Confirm email
//! PATCH  /<res>/{id}/activate       - Activate
//! PATCH  /<res>/{id}/deactivate     - Deactivate
//! ```
//!
//! `/users` also accepts `POST` on the three status routes.

pub mod entities;
pub mod home;

use std::time::Duration;

use axum::{
    Router,
    extract::State,
    http::{Request, Response, StatusCode},
    routing::get,
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use accounts_core::EntityKind;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Build the full application router with its middleware stack.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(home::index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness));

    for kind in EntityKind::ALL {
        router = router.merge(entities::routes(state.use_cases(kind)));
    }

    router
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if a store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
