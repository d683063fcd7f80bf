//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use marquee_app_core::{CatalogService, SqliteStore};
use marquee_storage::AnyStorage;

use crate::config::Config;

pub type Catalog = CatalogService<SqliteStore, AnyStorage>;

#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Actor and movie operations over the store and the bucket.
    pub catalog: Arc<Catalog>,
}
