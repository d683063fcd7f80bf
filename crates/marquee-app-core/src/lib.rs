//! Catalog core for marquee: entities, persistence, the list pipeline and the
//! single-record operations.  Has no HTTP dependency; `marquee-server` wires
//! it to axum.

pub mod entities;
pub mod error;
pub mod schemas;
pub mod services;

pub use entities::{ActorStore, MovieStore, SqliteStore};
pub use error::{CatalogError, ErrorKind, Upstream};
pub use services::CatalogService;
