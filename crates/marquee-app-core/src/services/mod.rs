//! Catalog operations.
//!
//! [`CatalogService`] owns the two collaborators (store and object storage)
//! and implements every actor and movie operation.  The list operations run
//! the read pipeline:
//!
//! 1. fetch active records with their related collection,
//! 2. fail with `NotFound` when nothing is active,
//! 3. resolve each record's asset reference concurrently ([`fanout`]),
//! 4. assemble response DTOs in input order.
//!
//! Single-record operations receive a record that was already loaded (see
//! [`CatalogService::find_actor`] / [`CatalogService::find_movie`]) and do not
//! resolve URLs.

mod actors;
pub mod fanout;
mod movies;

use std::sync::Arc;

use chrono::Utc;
use marquee_storage::{ObjectStorage, Url};
use tracing::{info, warn};

use crate::error::{CatalogError, Upstream};
use crate::schemas::ImageUpload;
use fanout::{fan_out, FanOutError};

pub struct CatalogService<S, O> {
    store: Arc<S>,
    storage: Arc<O>,
}

impl<S, O> Clone for CatalogService<S, O> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S, O> std::fmt::Debug for CatalogService<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CatalogService")
    }
}

impl<S, O: ObjectStorage> CatalogService<S, O> {
    pub fn new(store: Arc<S>, storage: Arc<O>) -> Self {
        Self { store, storage }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn storage(&self) -> &Arc<O> {
        &self.storage
    }

    /// Resolve every reference concurrently; URL `i` belongs to reference `i`.
    ///
    /// All-or-nothing: the first failed resolution fails the whole call and
    /// cancels the rest.
    async fn resolve_all(&self, references: Vec<String>) -> Result<Vec<Url>, CatalogError> {
        let storage = Arc::clone(&self.storage);
        fan_out(references, move |reference| {
            let storage = Arc::clone(&storage);
            async move {
                storage
                    .resolve_download_url(&reference)
                    .await
                    .map_err(|e| (reference, e))
            }
        })
        .await
        .map_err(|e| match e {
            FanOutError::Task {
                index,
                error: (reference, error),
            } => {
                warn!(index, reference = %reference, error = %error, "asset resolution failed; aborting list");
                CatalogError::from(error)
            }
            FanOutError::Join(e) => {
                warn!(error = %e, "asset resolution task did not complete");
                CatalogError::UpstreamFailure(Upstream::Task(e.to_string()))
            }
        })
    }

    /// Upload a create-request image and return its asset reference.
    async fn store_image(&self, image: ImageUpload) -> Result<String, CatalogError> {
        image.validate()?;
        let reference = image.asset_reference(Utc::now());
        let stored = self
            .storage
            .upload(&reference, image.bytes, &image.content_type)
            .await?;
        info!(full_path = %stored.full_path, size = stored.size, "image uploaded");
        Ok(stored.full_path)
    }
}

/// Empty catalogs are reported as `NotFound`, not as an empty list.
fn ensure_not_empty<T>(records: &[T], message: &str) -> Result<(), CatalogError> {
    if records.is_empty() {
        return Err(CatalogError::NotFound(message.to_owned()));
    }
    Ok(())
}
