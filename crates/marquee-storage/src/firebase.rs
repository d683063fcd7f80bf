//! Firebase Storage backend (REST v0 API).
//!
//! - metadata: `GET  {endpoint}/v0/b/{bucket}/o/{encoded path}`
//! - download: `GET  {endpoint}/v0/b/{bucket}/o/{encoded path}?alt=media&token={token}`
//! - upload:   `POST {endpoint}/v0/b/{bucket}/o?name={path}`
//!
//! The object path is a single URL segment, so `/` inside it is encoded as
//! `%2F`.  A download URL stays valid for as long as the object keeps the
//! download token it was issued with.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{validate_reference, ObjectStorage, StorageError, StoredObject};

pub const DEFAULT_ENDPOINT: &str = "https://firebasestorage.googleapis.com";

#[derive(Debug, Clone)]
pub struct FirebaseConfig {
    /// API root, normally [`DEFAULT_ENDPOINT`]; point it at the storage
    /// emulator for local runs.
    pub endpoint: String,
    /// Bucket name, e.g. `"my-project.appspot.com"`.
    pub bucket: String,
    /// Optional bearer token sent with every request.
    pub token: Option<String>,
    /// Per-request timeout of the underlying HTTP client.
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    #[serde(default)]
    content_type: Option<String>,
    /// Firebase reports the size as a decimal string.
    #[serde(default)]
    size: Option<String>,
    /// Comma-separated list of download tokens.
    #[serde(default)]
    download_tokens: Option<String>,
}

/// Client for a single Firebase Storage bucket.
#[derive(Debug, Clone)]
pub struct FirebaseStorage {
    /// `{endpoint}/v0/b/{bucket}/o`
    objects_url: Url,
    token: Option<String>,
    client: Client,
}

impl FirebaseStorage {
    pub fn new(config: FirebaseConfig) -> Result<Self, StorageError> {
        let objects_url = objects_url(&config.endpoint, &config.bucket)?;
        let client = Client::builder()
            .user_agent(concat!("marquee-storage/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            objects_url,
            token: config.token,
            client,
        })
    }

    fn object_url(&self, reference: &str) -> Url {
        let mut url = self.objects_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(reference);
        }
        url
    }

    async fn fetch_metadata(
        &self,
        request: RequestBuilder,
        reference: &str,
    ) -> Result<ObjectMetadata, StorageError> {
        let request = match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        };
        let resp = request.send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(reference.to_owned()));
        }
        let resp = resp.error_for_status()?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl ObjectStorage for FirebaseStorage {
    async fn resolve_download_url(&self, reference: &str) -> Result<Url, StorageError> {
        validate_reference(reference)?;
        let url = self.object_url(reference);
        let metadata = self
            .fetch_metadata(self.client.get(url.clone()), reference)
            .await?;
        let token = first_download_token(metadata.download_tokens.as_deref()).ok_or_else(|| {
            warn!(reference, "object has no download token");
            StorageError::InvalidResponse {
                message: format!("object {reference} has no download token"),
            }
        })?;
        Ok(download_url(url, token))
    }

    async fn upload(
        &self,
        reference: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        validate_reference(reference)?;
        let len = bytes.len() as u64;
        let mut url = self.objects_url.clone();
        url.query_pairs_mut().append_pair("name", reference);

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let metadata = self.fetch_metadata(request, reference).await?;
        debug!(full_path = %metadata.name, size = len, "uploaded object");

        Ok(StoredObject {
            size: metadata
                .size
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(len),
            full_path: metadata.name,
            content_type: metadata.content_type,
        })
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn objects_url(endpoint: &str, bucket: &str) -> Result<Url, StorageError> {
    let invalid = |message: String| StorageError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        message,
    };
    if bucket.trim().is_empty() {
        return Err(invalid("bucket name is empty".into()));
    }
    let mut url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("URL cannot be used as a base".into()))?
        .pop_if_empty()
        .extend(["v0", "b", bucket, "o"]);
    Ok(url)
}

fn first_download_token(tokens: Option<&str>) -> Option<&str> {
    tokens?.split(',').map(str::trim).find(|t| !t.is_empty())
}

fn download_url(mut object_url: Url, token: &str) -> Url {
    object_url
        .query_pairs_mut()
        .append_pair("alt", "media")
        .append_pair("token", token);
    object_url
}
