//! Server configuration, loaded from environment variables at startup.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Context};
use marquee_storage::firebase::DEFAULT_ENDPOINT;
use marquee_storage::{AnyStorage, FirebaseConfig, FirebaseStorage, MemoryStorage};
use strum::{Display, EnumString};

/// Download URLs handed out by the in-memory backend are rooted here unless
/// `MARQUEE_STORAGE_ENDPOINT` says otherwise.
const MEMORY_ENDPOINT: &str = "http://localhost:3000/assets";

/// Runtime configuration for marquee-server.
///
/// Every field has a default so the server starts without any environment
/// variables set (SQLite file in the working directory, in-memory bucket).
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    /// sqlx SQLite URL (default: `"sqlite://marquee.db"`).
    pub database_url: String,

    pub db_max_connections: u32,

    /// `tracing` filter string, e.g. `"info"` or `"debug,sqlx=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// When set, also write logs to a daily-rotated file in this directory.
    pub log_dir: Option<String>,

    /// Comma-separated list of allowed CORS origins; `None` allows any.
    pub cors_allowed_origins: Option<String>,

    pub enable_swagger: bool,

    /// Upper bound for multipart request bodies.
    pub max_upload_size_mb: usize,

    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Memory,
    Firebase,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Raw `MARQUEE_STORAGE_BACKEND` value; checked in [`StorageConfig::build`].
    pub backend: String,
    pub bucket: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: env_or("MARQUEE_BIND", "0.0.0.0:3000"),
            database_url: env_or("MARQUEE_DATABASE_URL", "sqlite://marquee.db"),
            db_max_connections: parse_env("MARQUEE_DB_MAX_CONNECTIONS", 5),
            log_level: env_or("MARQUEE_LOG", "info"),
            log_json: flag_env("MARQUEE_LOG_JSON", false),
            log_dir: optional_env("MARQUEE_LOG_DIR"),
            cors_allowed_origins: optional_env("MARQUEE_CORS_ORIGINS"),
            enable_swagger: flag_env("MARQUEE_ENABLE_SWAGGER", true),
            max_upload_size_mb: parse_env("MARQUEE_MAX_UPLOAD_SIZE_MB", 10),
            storage: StorageConfig {
                backend: env_or("MARQUEE_STORAGE_BACKEND", "memory"),
                bucket: optional_env("MARQUEE_STORAGE_BUCKET"),
                endpoint: optional_env("MARQUEE_STORAGE_ENDPOINT"),
                token: optional_env("MARQUEE_STORAGE_TOKEN"),
                timeout_secs: parse_env("MARQUEE_STORAGE_TIMEOUT_SECS", 30),
            },
        }
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

impl StorageConfig {
    /// Construct the configured object-storage backend.
    pub fn build(&self) -> anyhow::Result<AnyStorage> {
        let backend = StorageBackend::from_str(&self.backend)
            .map_err(|_| anyhow!("unknown storage backend '{}' (expected memory or firebase)", self.backend))?;

        match backend {
            StorageBackend::Memory => {
                let endpoint = self.endpoint.as_deref().unwrap_or(MEMORY_ENDPOINT);
                let storage = MemoryStorage::new(endpoint)
                    .with_context(|| format!("invalid MARQUEE_STORAGE_ENDPOINT '{endpoint}'"))?;
                Ok(AnyStorage::Memory(storage))
            }
            StorageBackend::Firebase => {
                let bucket = self
                    .bucket
                    .clone()
                    .context("MARQUEE_STORAGE_BUCKET is required for the firebase backend")?;
                let storage = FirebaseStorage::new(FirebaseConfig {
                    endpoint: self
                        .endpoint
                        .clone()
                        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned()),
                    bucket,
                    token: self.token.clone(),
                    timeout: Duration::from_secs(self.timeout_secs.max(1)),
                })
                .context("failed to configure firebase storage")?;
                Ok(AnyStorage::Firebase(storage))
            }
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn flag_env(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod test {
    use super::*;

    fn storage(backend: &str) -> StorageConfig {
        StorageConfig {
            backend: backend.into(),
            bucket: None,
            endpoint: None,
            token: None,
            timeout_secs: 30,
        }
    }

    #[test]
    fn memory_backend_is_the_default_shape() {
        let built = storage("memory").build().unwrap();
        assert_eq!(built.backend_name(), "memory");
        assert_eq!(storage("MEMORY").build().unwrap().backend_name(), "memory");
    }

    #[test]
    fn firebase_needs_a_bucket() {
        let err = storage("firebase").build().unwrap_err();
        assert!(err.to_string().contains("MARQUEE_STORAGE_BUCKET"));

        let mut cfg = storage("firebase");
        cfg.bucket = Some("demo.appspot.com".into());
        assert_eq!(cfg.build().unwrap().backend_name(), "firebase");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(storage("s3").build().is_err());
    }
}
