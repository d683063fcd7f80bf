//! Catalog error taxonomy.
//!
//! Every catalog operation fails with one of three kinds:
//! [`ErrorKind::NotFound`], [`ErrorKind::ValidationFailed`] or
//! [`ErrorKind::UpstreamFailure`].  Upstream failures keep their source
//! (database, object storage, task group) so the server can log the detail
//! while answering with a generic message.

use marquee_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Empty collection or missing/soft-deleted record.
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or malformed input.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// A collaborator (store, object storage) failed.
    #[error("upstream failure: {0}")]
    UpstreamFailure(#[from] Upstream),
}

/// Source of an [`CatalogError::UpstreamFailure`].
#[derive(Debug, Error)]
pub enum Upstream {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("object storage error: {0}")]
    Storage(#[from] StorageError),

    /// A fan-out task panicked or was cancelled.
    #[error("resolution task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    UpstreamFailure,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::ValidationFailed => "validation_failed",
            ErrorKind::UpstreamFailure => "upstream_failure",
        }
    }
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::ValidationFailed(_) => ErrorKind::ValidationFailed,
            CatalogError::UpstreamFailure(_) => ErrorKind::UpstreamFailure,
        }
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(e: sqlx::Error) -> Self {
        CatalogError::UpstreamFailure(Upstream::Database(e))
    }
}

impl From<StorageError> for CatalogError {
    fn from(e: StorageError) -> Self {
        CatalogError::UpstreamFailure(Upstream::Storage(e))
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(e: validator::ValidationErrors) -> Self {
        CatalogError::ValidationFailed(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn storage_errors_are_upstream_failures() {
        let err: CatalogError = StorageError::NotFound("imgs/a.jpg".into()).into();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
        assert!(err.to_string().contains("imgs/a.jpg"));
    }

    #[test]
    fn database_errors_are_upstream_failures() {
        let err: CatalogError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind().as_str(), "upstream_failure");
    }

    #[test]
    fn kind_names() {
        assert_eq!(CatalogError::NotFound("x".into()).kind().as_str(), "not_found");
        assert_eq!(
            CatalogError::ValidationFailed("x".into()).kind().as_str(),
            "validation_failed"
        );
    }
}
