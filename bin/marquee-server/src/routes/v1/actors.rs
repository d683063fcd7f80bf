//! Actor routes.
//!
//! `/actors/{id}` is guarded by [`load_actor`], so every handler below it
//! receives an active [`ActorRecord`] through the request extensions.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use marquee_app_core::entities::ActorRecord;
use marquee_app_core::schemas::{ActorPatch, ActorResponse, ActorSummary, NewActor};
use marquee_app_core::CatalogError;
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::middleware::loader::load_actor;
use crate::routes::v1::form::{ActorUploadForm, CreateForm};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_actors, create_actor, get_actor, update_actor, delete_actor),
    components(schemas(ActorResponse, ActorSummary, ActorPatch, ActorUploadForm))
)]
pub struct ActorsApi;

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let by_id = Router::new()
        .route(
            "/actors/{id}",
            get(get_actor).patch(update_actor).delete(delete_actor),
        )
        .route_layer(middleware::from_fn_with_state(state, load_actor));

    Router::new()
        .route("/actors", get(list_actors).post(create_actor))
        .merge(by_id)
}

/// List every active actor with resolved profile-picture URLs.
#[utoipa::path(
    get,
    path = "/api/v1/actors",
    tag = "actors",
    responses(
        (status = 201, description = "Actors with resolved picture URLs", body = Value),
        (status = 404, description = "There are no actors yet"),
        (status = 502, description = "Store or object storage failed"),
    )
)]
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let actors = state.catalog.list_actors().await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "actor": actors } })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/actors",
    tag = "actors",
    request_body(content = ActorUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Actor created", body = Value),
        (status = 400, description = "Missing field, bad number or non-image file"),
        (status = 502, description = "Store or object storage failed"),
    )
)]
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let mut form = CreateForm::read(multipart, state.config.max_upload_size_bytes()).await?;
    let input = NewActor {
        name: form.text("name")?,
        country: form.text("country")?,
        rating: form.number("rating")?,
        age: form.number("age")?,
    };
    let image = form.image()?;

    let actor = state.catalog.create_actor(input, image).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "actor": actor } })),
    ))
}

/// Fetch one actor.  `profilePic` is the stored reference, not a URL.
#[utoipa::path(
    get,
    path = "/api/v1/actors/{id}",
    tag = "actors",
    params(("id" = i64, Path, description = "Actor id")),
    responses(
        (status = 200, description = "Actor found", body = Value),
        (status = 400, description = "Id is not an integer"),
        (status = 404, description = "No active actor with this id"),
    )
)]
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<ActorRecord>,
) -> Result<Json<Value>, ServerError> {
    let actor = state.catalog.actor_details(actor).await?;
    Ok(Json(json!({ "status": "success", "data": { "actor": actor } })))
}

#[utoipa::path(
    patch,
    path = "/api/v1/actors/{id}",
    tag = "actors",
    params(("id" = i64, Path, description = "Actor id")),
    request_body = ActorPatch,
    responses(
        (status = 201, description = "Actor updated", body = Value),
        (status = 400, description = "Unknown key or invalid value"),
        (status = 404, description = "No active actor with this id"),
    )
)]
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<ActorRecord>,
    payload: Result<Json<ActorPatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let Json(patch) = payload.map_err(|e| CatalogError::ValidationFailed(e.body_text()))?;
    let actor = state.catalog.update_actor(actor, patch).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("The actor with id {} was updated", actor.id),
        })),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/actors/{id}",
    tag = "actors",
    params(("id" = i64, Path, description = "Actor id")),
    responses(
        (status = 201, description = "Actor soft-deleted", body = Value),
        (status = 404, description = "No active actor with this id"),
    )
)]
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<ActorRecord>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    state.catalog.delete_actor(&actor).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("The actor with id {} was deleted", actor.id),
        })),
    ))
}
