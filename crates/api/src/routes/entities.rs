//! Customer and user route handlers.
//!
//! Both resources share these handlers; each resource gets its own router
//! whose state is that kind's [`UseCases`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    handler::Handler,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodRouter, get, patch},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use accounts_core::EntityKind;

use crate::error::Result;
use crate::models::{CreateEntityRequest, Entity, EntityPatch};
use crate::services::{UseCases, parse_id};

type Cases = Arc<UseCases>;

/// Query string of the search route.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// Routes for one resource, mounted under `/<resource>`.
pub fn routes<S>(use_cases: Cases) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let kind = use_cases.kind();
    let base = format!("/{}", kind.resource());

    Router::new()
        .route(&base, get(list).post(create))
        .route(&format!("{base}/search"), get(search))
        .route(&format!("{base}/email/{{email}}"), get(get_by_email))
        .route(
            &format!("{base}/{{id}}"),
            get(get_one).patch(update).delete(remove),
        )
        .route(
            &format!("{base}/{{id}}/confirm-email"),
            status_route(kind, confirm_email),
        )
        .route(
            &format!("{base}/{{id}}/activate"),
            status_route(kind, activate),
        )
        .route(
            &format!("{base}/{{id}}/deactivate"),
            status_route(kind, deactivate),
        )
        .with_state(use_cases)
}

/// Status changes are `PATCH`; `/users` also accepts `POST`.
fn status_route<H, T>(kind: EntityKind, handler: H) -> MethodRouter<Cases>
where
    H: Handler<T, Cases>,
    T: 'static,
{
    let route = patch(handler.clone());
    match kind {
        EntityKind::User => route.post(handler),
        EntityKind::Customer => route,
    }
}

/// `GET /<resource>`
#[instrument(skip(use_cases))]
async fn list(State(use_cases): State<Cases>) -> Result<Json<Vec<Entity>>> {
    Ok(Json(use_cases.list.handle().await?))
}

/// `GET /<resource>/search?q=`
#[instrument(skip(use_cases, params))]
async fn search(
    State(use_cases): State<Cases>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Entity>>> {
    let Query(params) = params?;
    Ok(Json(use_cases.search.handle(&params.q).await?))
}

/// `GET /<resource>/{id}`
#[instrument(skip(use_cases))]
async fn get_one(State(use_cases): State<Cases>, Path(id): Path<String>) -> Result<Json<Entity>> {
    let id = parse_id(use_cases.kind(), &id)?;
    Ok(Json(use_cases.get.handle(id).await?))
}

/// `GET /<resource>/email/{email}`
#[instrument(skip(use_cases))]
async fn get_by_email(
    State(use_cases): State<Cases>,
    Path(email): Path<String>,
) -> Result<Json<Entity>> {
    Ok(Json(use_cases.get_by_email.handle(&email).await?))
}

/// `POST /<resource>`
#[instrument(skip(use_cases, payload))]
async fn create(
    State(use_cases): State<Cases>,
    payload: std::result::Result<Json<CreateEntityRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Entity>)> {
    let Json(request) = payload?;
    let entity = use_cases.create.handle(request).await?;
    Ok((StatusCode::CREATED, Json(entity)))
}

/// `PATCH /<resource>/{id}`
#[instrument(skip(use_cases, payload))]
async fn update(
    State(use_cases): State<Cases>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<EntityPatch>, JsonRejection>,
) -> Result<Json<Entity>> {
    let id = parse_id(use_cases.kind(), &id)?;
    let Json(patch) = payload?;
    Ok(Json(use_cases.update.handle(id, patch).await?))
}

/// `DELETE /<resource>/{id}`
///
/// Customers answer `204 No Content`; users answer `200` with a message.
#[instrument(skip(use_cases))]
async fn remove(State(use_cases): State<Cases>, Path(id): Path<String>) -> Result<Response> {
    let kind = use_cases.kind();
    let id = parse_id(kind, &id)?;
    use_cases.delete.handle(id).await?;

    Ok(match kind {
        EntityKind::Customer => StatusCode::NO_CONTENT.into_response(),
        EntityKind::User => Json(json!({ "message": "User deleted successfully" })).into_response(),
    })
}

/// `PATCH /<resource>/{id}/confirm-email`
#[instrument(skip(use_cases))]
async fn confirm_email(
    State(use_cases): State<Cases>,
    Path(id): Path<String>,
) -> Result<Json<Entity>> {
    let id = parse_id(use_cases.kind(), &id)?;
    Ok(Json(use_cases.confirm_email.handle(id).await?))
}

/// `PATCH /<resource>/{id}/activate`
#[instrument(skip(use_cases))]
async fn activate(State(use_cases): State<Cases>, Path(id): Path<String>) -> Result<Json<Entity>> {
    let id = parse_id(use_cases.kind(), &id)?;
    Ok(Json(use_cases.activate.handle(id).await?))
}

/// `PATCH /<resource>/{id}/deactivate`
#[instrument(skip(use_cases))]
async fn deactivate(
    State(use_cases): State<Cases>,
    Path(id): Path<String>,
) -> Result<Json<Entity>> {
    let id = parse_id(use_cases.kind(), &id)?;
    Ok(Json(use_cases.deactivate.handle(id).await?))
}
