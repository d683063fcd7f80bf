//! Object-storage collaborator for marquee.
//!
//! Catalog records only store an *asset reference* (a bucket path such as
//! `imgs/1700000000000-poster.jpg`).  [`ObjectStorage`] turns such a
//! reference into a fetchable download URL and accepts new uploads.
//!
//! Two backends are provided:
//! - [`FirebaseStorage`]: Firebase / Google Cloud Storage over the REST v0 API.
//! - [`MemoryStorage`]: an in-process bucket for local development and tests.
//!
//! [`AnyStorage`] wraps either one so the server can pick a backend at runtime
//! while handlers stay generic over [`ObjectStorage`].

pub mod error;
pub mod firebase;
pub mod memory;

use std::future::Future;

use bytes::Bytes;

pub use error::StorageError;
pub use firebase::{FirebaseConfig, FirebaseStorage};
pub use memory::MemoryStorage;
pub use reqwest::Url;

/// Metadata returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Full path of the object inside the bucket; this is the asset reference
    /// that gets persisted on the catalog record.
    pub full_path: String,
    pub content_type: Option<String>,
    pub size: u64,
}

/// Interface to the bucket holding catalog images.
///
/// All trait methods use `impl Future` in their signatures so no extra
/// `async-trait` crate is required.
pub trait ObjectStorage: Send + Sync + 'static {
    /// Resolve a stored reference to a time-limited download URL.
    ///
    /// Fails with [`StorageError::InvalidReference`] for an empty reference and
    /// [`StorageError::NotFound`] when the object does not exist.
    fn resolve_download_url(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Url, StorageError>> + Send;

    /// Store `bytes` under `reference`.
    fn upload(
        &self,
        reference: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> impl Future<Output = Result<StoredObject, StorageError>> + Send;
}

/// Rejects references that cannot name an object.
pub fn validate_reference(reference: &str) -> Result<(), StorageError> {
    if reference.trim().is_empty() {
        return Err(StorageError::InvalidReference(reference.to_owned()));
    }
    Ok(())
}

/// Runtime-selected storage backend.
#[derive(Debug, Clone)]
pub enum AnyStorage {
    Firebase(FirebaseStorage),
    Memory(MemoryStorage),
}

impl AnyStorage {
    pub fn backend_name(&self) -> &'static str {
        match self {
            AnyStorage::Firebase(_) => "firebase",
            AnyStorage::Memory(_) => "memory",
        }
    }
}

impl ObjectStorage for AnyStorage {
    async fn resolve_download_url(&self, reference: &str) -> Result<Url, StorageError> {
        match self {
            AnyStorage::Firebase(s) => s.resolve_download_url(reference).await,
            AnyStorage::Memory(s) => s.resolve_download_url(reference).await,
        }
    }

    async fn upload(
        &self,
        reference: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        match self {
            AnyStorage::Firebase(s) => s.upload(reference, bytes, content_type).await,
            AnyStorage::Memory(s) => s.upload(reference, bytes, content_type).await,
        }
    }
}
