//! Record loaders for `/{id}` routes.
//!
//! Applied with `route_layer`, so the path is already matched.  The loader
//! parses the id, fetches the active record and stores it in the request
//! extensions; handlers then take it with `Extension<ActorRecord>` /
//! `Extension<MovieRecord>`.  Missing and soft-deleted records never reach a
//! handler.

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::ServerError;
use crate::state::AppState;

pub async fn load_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    let actor = state.catalog.find_actor(id).await?;
    debug!(actor_id = actor.id, "actor loaded");
    req.extensions_mut().insert(actor);
    Ok(next.run(req).await)
}

pub async fn load_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let id = parse_id(&id)?;
    let movie = state.catalog.find_movie(id).await?;
    debug!(movie_id = movie.id, "movie loaded");
    req.extensions_mut().insert(movie);
    Ok(next.run(req).await)
}

fn parse_id(raw: &str) -> Result<i64, ServerError> {
    raw.parse()
        .map_err(|_| ServerError::BadRequest(format!("invalid id '{raw}': expected an integer")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(ServerError::BadRequest(_))));
        assert!(parse_id("").is_err());
    }
}
