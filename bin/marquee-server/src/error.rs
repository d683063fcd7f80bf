//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] and renders the failure envelope
//! `{"status": "fail", "kind": ..., "message": ...}`.
//!
//! Upstream failures (database, object storage) are logged with full detail
//! but only a generic message is returned so that SQL, bucket paths or
//! transport errors never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use marquee_app_core::{CatalogError, ErrorKind};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Malformed request that never reached the catalog (bad path id,
    /// unreadable multipart body).
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl ServerError {
    fn kind(&self) -> ErrorKind {
        match self {
            ServerError::Catalog(e) => e.kind(),
            ServerError::BadRequest(_) => ErrorKind::ValidationFailed,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let (status, client_message) = match &self {
            ServerError::Catalog(CatalogError::NotFound(m)) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::Catalog(CatalogError::ValidationFailed(m)) | ServerError::BadRequest(m) => {
                (StatusCode::BAD_REQUEST, m.clone())
            }
            ServerError::Catalog(CatalogError::UpstreamFailure(e)) => {
                error!(error = %e, "upstream failure");
                (
                    StatusCode::BAD_GATEWAY,
                    "an upstream service failed; please retry later".to_owned(),
                )
            }
        };
        (
            status,
            Json(json!({
                "status": "fail",
                "kind": kind.as_str(),
                "message": client_message,
            })),
        )
            .into_response()
    }
}
