//! Persistence layer.
//!
//! [`ActorStore`] and [`MovieStore`] define the queries the catalog needs.
//! The default implementation is [`SqliteStore`]; to swap databases,
//! implement both traits for a new type and change the concrete type in the
//! server's `AppState`.
//!
//! All trait methods use `impl Future` in their signatures (stable since Rust
//! 1.75) so no extra `async-trait` crate is required.
//!
//! Queries use the runtime-checked `sqlx::query` form so that no
//! `DATABASE_URL` is needed at compile time.

pub mod actor;
pub mod dao;
pub mod movie;

pub use actor::ActorStore;
pub use dao::{
    ActorDraft, ActorRecord, ActorWithMovies, MovieDraft, MovieRecord, MovieWithActors,
    RecordStatus,
};
pub use movie::MovieStore;

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::warn;

/// SQLite-backed catalog store.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible SQLite URL, e.g. `"sqlite://marquee.db"`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    /// Private in-memory database.  A single pinned connection keeps the
    /// database alive for the lifetime of the pool.
    pub async fn connect_in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        // Path is resolved relative to CARGO_MANIFEST_DIR at compile time.
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}

// ── row mapping shared by both stores ────────────────────────────────────────

/// `id, name, country, rating, age, profile_pic, status, created_at, updated_at`
pub(crate) type ActorRow = (i64, String, String, f64, i64, String, String, String, String);

/// `id, title, description, duration, rating, img_url, genre, status, created_at, updated_at`
pub(crate) type MovieRow = (
    i64,
    String,
    String,
    i64,
    f64,
    String,
    String,
    String,
    String,
    String,
);

pub(crate) fn actor_from_row(row: ActorRow) -> Result<ActorRecord, sqlx::Error> {
    let (id, name, country, rating, age, profile_pic, status, created_at, updated_at) = row;
    Ok(ActorRecord {
        id,
        name,
        country,
        rating,
        age,
        profile_pic,
        status: parse_status(&status),
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

pub(crate) fn movie_from_row(row: MovieRow) -> Result<MovieRecord, sqlx::Error> {
    let (id, title, description, duration, rating, img_url, genre, status, created_at, updated_at) =
        row;
    Ok(MovieRecord {
        id,
        title,
        description,
        duration,
        rating,
        img_url,
        genre,
        status: parse_status(&status),
        created_at: parse_timestamp(&created_at, "created_at")?,
        updated_at: parse_timestamp(&updated_at, "updated_at")?,
    })
}

fn parse_status(raw: &str) -> RecordStatus {
    RecordStatus::from_str(raw).unwrap_or_else(|_| {
        warn!(raw = %raw, "unknown record status; treating as deleted");
        RecordStatus::Deleted
    })
}

/// Timestamps are stored as RFC 3339 text; anything else is a decode error.
fn parse_timestamp(raw: &str, column: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    raw.parse().map_err(|e: chrono::ParseError| {
        warn!(raw = %raw, column, error = %e, "corrupt timestamp column");
        sqlx::Error::ColumnDecode {
            index: column.to_owned(),
            source: Box::new(e),
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_status_is_hidden() {
        assert_eq!(parse_status("active"), RecordStatus::Active);
        assert_eq!(parse_status("purged"), RecordStatus::Deleted);
    }

    #[test]
    fn timestamps_round_trip_through_rfc3339() {
        let now = Utc::now();
        assert_eq!(parse_timestamp(&now.to_rfc3339(), "created_at").unwrap(), now);
    }

    #[test]
    fn corrupt_timestamps_are_decode_errors() {
        let err = parse_timestamp("yesterday", "updated_at").unwrap_err();
        assert!(matches!(err, sqlx::Error::ColumnDecode { ref index, .. } if index == "updated_at"));
    }

    #[tokio::test]
    async fn in_memory_store_runs_migrations() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
             AND name IN ('actors', 'movies', 'actors_in_movies')",
        )
        .fetch_one(&store.pool)
        .await
        .unwrap();
        assert_eq!(count, 3);
    }
}
