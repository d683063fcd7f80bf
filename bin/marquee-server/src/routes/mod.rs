//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection, body limit)
//! - Optional Swagger UI / OpenAPI document endpoint (disable with `MARQUEE_ENABLE_SWAGGER=false`)
//! - Health / heartbeat route
//! - Catalog routes under `/api/v1`

pub mod doc;
mod health;
mod v1;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{middleware, Router};
use tower::ServiceBuilder;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Multipart framing and text fields on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .nest("/api/v1", v1::router(Arc::clone(&state)));

    if state.config.enable_swagger {
        app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::get_docs()));
    }

    let body_limit = state.config.max_upload_size_bytes().saturating_add(FORM_OVERHEAD_BYTES);

    app.layer(
        ServiceBuilder::new()
            // Outermost layers execute first on the way in.
            .layer(middleware::from_fn(trace::trace_middleware))
            .layer(cors::cors_layer(&state))
            .layer(DefaultBodyLimit::max(body_limit)),
    )
    .with_state(state)
}
