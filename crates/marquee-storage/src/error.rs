use thiserror::Error;

/// Errors that can be returned by object-storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The asset reference was empty or otherwise unusable as an object key.
    #[error("invalid object reference: {0:?}")]
    InvalidReference(String),

    /// The referenced object does not exist in the bucket.
    #[error("object not found: {0}")]
    NotFound(String),

    /// The configured storage endpoint could not be turned into a base URL.
    #[error("invalid storage endpoint {endpoint}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// An HTTP request failed (network error, non-2xx status, etc.).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to decode the provider's JSON metadata.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The provider answered, but without a field we need.
    #[error("invalid storage response: {message}")]
    InvalidResponse { message: String },
}

impl StorageError {
    /// `true` for failures caused by the object itself rather than the transport.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}
