use chrono::{DateTime, Utc};

use super::{MovieRecord, RecordStatus};

/// A row in the `actors` table.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorRecord {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub rating: f64,
    pub age: i64,
    /// Asset reference (bucket path) of the profile picture, not a URL.
    pub profile_pic: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Column values for a new `actors` row.
#[derive(Debug, Clone)]
pub struct ActorDraft {
    pub name: String,
    pub country: String,
    pub rating: f64,
    pub age: i64,
    pub profile_pic: String,
}

/// An actor with its active movies eagerly attached.
#[derive(Debug, Clone)]
pub struct ActorWithMovies {
    pub actor: ActorRecord,
    pub movies: Vec<MovieRecord>,
}
