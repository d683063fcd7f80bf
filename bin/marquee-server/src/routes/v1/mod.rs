pub mod actors;
mod form;
pub mod movies;

use std::sync::Arc;

use axum::Router;
use utoipa::OpenApi;

use crate::state::AppState;

/// Routes nested under `/api/v1`.
pub fn router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .merge(actors::router(Arc::clone(&state)))
        .merge(movies::router(state))
}

pub fn api_docs() -> utoipa::openapi::OpenApi {
    let mut doc = actors::ActorsApi::openapi();
    doc.merge(movies::MoviesApi::openapi());
    doc
}
