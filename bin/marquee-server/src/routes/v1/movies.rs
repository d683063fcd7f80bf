//! Movie routes.  Same shape as the actor routes; the list key is `movies`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{middleware, Extension, Json, Router};
use marquee_app_core::entities::MovieRecord;
use marquee_app_core::schemas::{MoviePatch, MovieResponse, MovieSummary, NewMovie};
use marquee_app_core::CatalogError;
use serde_json::{json, Value};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::middleware::loader::load_movie;
use crate::routes::v1::form::{CreateForm, MovieUploadForm};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(list_movies, create_movie, get_movie, update_movie, delete_movie),
    components(schemas(MovieResponse, MovieSummary, MoviePatch, MovieUploadForm))
)]
pub struct MoviesApi;

pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let by_id = Router::new()
        .route(
            "/movies/{id}",
            get(get_movie).patch(update_movie).delete(delete_movie),
        )
        .route_layer(middleware::from_fn_with_state(state, load_movie));

    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .merge(by_id)
}

/// List every active movie with resolved poster URLs.
#[utoipa::path(
    get,
    path = "/api/v1/movies",
    tag = "movies",
    responses(
        (status = 201, description = "Movies with resolved poster URLs", body = Value),
        (status = 404, description = "There are no movies yet"),
        (status = 502, description = "Store or object storage failed"),
    )
)]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let movies = state.catalog.list_movies().await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "movies": movies } })),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/movies",
    tag = "movies",
    request_body(content = MovieUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Movie created", body = Value),
        (status = 400, description = "Missing field, unknown actor or non-image file"),
        (status = 502, description = "Store or object storage failed"),
    )
)]
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let mut form = CreateForm::read(multipart, state.config.max_upload_size_bytes()).await?;
    let input = NewMovie {
        title: form.text("title")?,
        description: form.text("description")?,
        duration: form.number("duration")?,
        rating: form.number("rating")?,
        genre: form.text("genre")?,
        actor_ids: form.id_list("actorIds")?,
    };
    let image = form.image()?;

    let movie = state.catalog.create_movie(input, image).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "success", "data": { "movie": movie } })),
    ))
}

/// Fetch one movie.  `imgUrl` is the stored reference, not a URL.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 200, description = "Movie found", body = Value),
        (status = 400, description = "Id is not an integer"),
        (status = 404, description = "No active movie with this id"),
    )
)]
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Extension(movie): Extension<MovieRecord>,
) -> Result<Json<Value>, ServerError> {
    let movie = state.catalog.movie_details(movie).await?;
    Ok(Json(json!({ "status": "success", "data": { "movie": movie } })))
}

#[utoipa::path(
    patch,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    request_body = MoviePatch,
    responses(
        (status = 201, description = "Movie updated", body = Value),
        (status = 400, description = "Unknown key or invalid value"),
        (status = 404, description = "No active movie with this id"),
    )
)]
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Extension(movie): Extension<MovieRecord>,
    payload: Result<Json<MoviePatch>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    let Json(patch) = payload.map_err(|e| CatalogError::ValidationFailed(e.body_text()))?;
    let movie = state.catalog.update_movie(movie, patch).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("The movie with id {} was updated", movie.id),
        })),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/movies/{id}",
    tag = "movies",
    params(("id" = i64, Path, description = "Movie id")),
    responses(
        (status = 201, description = "Movie soft-deleted", body = Value),
        (status = 404, description = "No active movie with this id"),
    )
)]
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Extension(movie): Extension<MovieRecord>,
) -> Result<(StatusCode, Json<Value>), ServerError> {
    state.catalog.delete_movie(&movie).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "status": "success",
            "message": format!("The movie with id {} was deleted", movie.id),
        })),
    ))
}
