use chrono::{DateTime, Utc};

use super::{ActorRecord, RecordStatus};

/// A row in the `movies` table.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Running time in minutes.
    pub duration: i64,
    pub rating: f64,
    /// Asset reference (bucket path) of the poster, not a URL.
    pub img_url: String,
    pub genre: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a new `movies` row.
#[derive(Debug, Clone)]
pub struct MovieDraft {
    pub title: String,
    pub description: String,
    pub duration: i64,
    pub rating: f64,
    pub img_url: String,
    pub genre: String,
}

/// A movie with its active cast eagerly attached.
#[derive(Debug, Clone)]
pub struct MovieWithActors {
    pub movie: MovieRecord,
    pub actors: Vec<ActorRecord>,
}
