//! In-process bucket.
//!
//! Objects live in a `HashMap` behind a lock.  Download URLs point at
//! `{base_url}/{encoded reference}?token=...`; the token is minted once per
//! upload, mirroring how Firebase attaches a download token to each object.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use bytes::Bytes;
use reqwest::Url;
use tracing::debug;
use uuid::Uuid;

use crate::{validate_reference, ObjectStorage, StorageError, StoredObject};

#[derive(Debug, Clone)]
struct MemoryObject {
    bytes: Bytes,
    content_type: String,
    token: String,
}

/// Object storage kept entirely in memory.  Cloning shares the same bucket.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    base: Url,
    objects: Arc<RwLock<HashMap<String, MemoryObject>>>,
}

impl MemoryStorage {
    /// Create an empty bucket whose download URLs are rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, StorageError> {
        let base = Url::parse(base_url).map_err(|e| StorageError::InvalidEndpoint {
            endpoint: base_url.to_owned(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(StorageError::InvalidEndpoint {
                endpoint: base_url.to_owned(),
                message: "URL cannot be used as a base".into(),
            });
        }
        Ok(Self {
            base,
            objects: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Seed an object synchronously.  Overwrites any previous object.
    pub fn insert(&self, reference: &str, bytes: Bytes, content_type: &str) {
        if let Ok(mut map) = self.objects.write() {
            map.insert(
                reference.to_owned(),
                MemoryObject {
                    bytes,
                    content_type: content_type.to_owned(),
                    token: Uuid::new_v4().to_string(),
                },
            );
        }
    }

    /// Raw bytes of a stored object.
    pub fn get(&self, reference: &str) -> Option<Bytes> {
        self.objects
            .read()
            .ok()
            .and_then(|map| map.get(reference).map(|o| o.bytes.clone()))
    }

    pub fn content_type(&self, reference: &str) -> Option<String> {
        self.objects
            .read()
            .ok()
            .and_then(|map| map.get(reference).map(|o| o.content_type.clone()))
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn download_url(&self, reference: &str, token: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(reference);
        }
        url.query_pairs_mut().append_pair("token", token);
        url
    }
}

impl ObjectStorage for MemoryStorage {
    async fn resolve_download_url(&self, reference: &str) -> Result<Url, StorageError> {
        validate_reference(reference)?;
        let token = self
            .objects
            .read()
            .ok()
            .and_then(|map| map.get(reference).map(|o| o.token.clone()))
            .ok_or_else(|| StorageError::NotFound(reference.to_owned()))?;
        Ok(self.download_url(reference, &token))
    }

    async fn upload(
        &self,
        reference: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_reference(reference)?;
        let size = bytes.len() as u64;
        self.insert(reference, bytes, content_type);
        debug!(reference, size, "stored object in memory bucket");
        Ok(StoredObject {
            full_path: reference.to_owned(),
            content_type: Some(content_type.to_owned()),
            size,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn bucket() -> MemoryStorage {
        MemoryStorage::new("http://assets.local/bucket/").unwrap()
    }

    #[tokio::test]
    async fn upload_then_resolve() {
        let storage = bucket();
        let stored = storage
            .upload("imgs/1-poster.png", Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert_eq!(stored.full_path, "imgs/1-poster.png");
        assert_eq!(stored.size, 3);

        let url = storage.resolve_download_url("imgs/1-poster.png").await.unwrap();
        assert_eq!(url.path(), "/bucket/imgs%2F1-poster.png");
        assert!(url.query().unwrap_or("").starts_with("token="));
        assert_eq!(storage.get("imgs/1-poster.png").unwrap(), Bytes::from_static(b"png"));
    }

    #[tokio::test]
    async fn resolving_twice_returns_the_same_url() {
        let storage = bucket();
        storage.insert("a.jpg", Bytes::new(), "image/jpeg");
        let first = storage.resolve_download_url("a.jpg").await.unwrap();
        let second = storage.resolve_download_url("a.jpg").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let err = bucket().resolve_download_url("nope.jpg").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn empty_reference_is_rejected_before_lookup() {
        let err = bucket().upload("", Bytes::new(), "image/png").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidReference(_)));
    }

    #[test]
    fn clones_share_the_bucket() {
        let storage = bucket();
        let clone = storage.clone();
        clone.insert("b.jpg", Bytes::from_static(b"x"), "image/jpeg");
        assert_eq!(storage.len(), 1);
        assert!(!storage.is_empty());
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(MemoryStorage::new("mailto:someone@example.com").is_err());
        assert!(MemoryStorage::new("not a url").is_err());
    }
}
