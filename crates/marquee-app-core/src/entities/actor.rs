use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;

use crate::entities::{
    actor_from_row, movie_from_row, ActorDraft, ActorRecord, ActorRow, ActorWithMovies, MovieRecord,
    MovieRow, RecordStatus, SqliteStore,
};

pub trait ActorStore: Send + Sync + 'static {
    /// All active actors ordered by id, each with its active movies.
    fn list_active_actors(
        &self,
    ) -> impl Future<Output = Result<Vec<ActorWithMovies>, sqlx::Error>> + Send;
    fn find_active_actor(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<ActorRecord>, sqlx::Error>> + Send;
    fn list_movies_for_actor(
        &self,
        actor_id: i64,
    ) -> impl Future<Output = Result<Vec<MovieRecord>, sqlx::Error>> + Send;
    fn insert_actor(
        &self,
        draft: ActorDraft,
    ) -> impl Future<Output = Result<ActorRecord, sqlx::Error>> + Send;
    /// Persist the scalar fields of `actor` (everything except id, status and created_at).
    fn update_actor(
        &self,
        actor: &ActorRecord,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    /// Set the status column and bump `updated_at`.  Returns rows affected.
    fn set_actor_status(
        &self,
        id: i64,
        status: RecordStatus,
    ) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl ActorStore for SqliteStore {
    async fn list_active_actors(&self) -> Result<Vec<ActorWithMovies>, sqlx::Error> {
        let actors: Vec<ActorRow> = sqlx::query_as(
            "SELECT id, name, country, rating, age, profile_pic, status, created_at, updated_at \
             FROM actors WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        // One query for every relation instead of one per actor.
        let links: Vec<(i64, i64, String, String, i64, f64, String, String, String, String, String)> =
            sqlx::query_as(
                "SELECT l.actor_id, m.id, m.title, m.description, m.duration, m.rating, m.img_url, \
                        m.genre, m.status, m.created_at, m.updated_at \
                 FROM actors_in_movies l \
                 JOIN movies m ON m.id = l.movie_id \
                 JOIN actors a ON a.id = l.actor_id \
                 WHERE a.status = 'active' AND m.status = 'active' \
                 ORDER BY l.actor_id, m.id",
            )
            .fetch_all(&self.pool)
            .await?;

        let mut movies_by_actor: HashMap<i64, Vec<MovieRecord>> = HashMap::new();
        for (actor_id, id, title, description, duration, rating, img_url, genre, status, c, u) in links
        {
            let row: MovieRow = (id, title, description, duration, rating, img_url, genre, status, c, u);
            movies_by_actor
                .entry(actor_id)
                .or_default()
                .push(movie_from_row(row)?);
        }

        actors
            .into_iter()
            .map(|row| {
                let actor = actor_from_row(row)?;
                Ok::<_, sqlx::Error>(ActorWithMovies {
                    movies: movies_by_actor.remove(&actor.id).unwrap_or_default(),
                    actor,
                })
            })
            .collect()
    }

    async fn find_active_actor(&self, id: i64) -> Result<Option<ActorRecord>, sqlx::Error> {
        let row: Option<ActorRow> = sqlx::query_as(
            "SELECT id, name, country, rating, age, profile_pic, status, created_at, updated_at \
             FROM actors WHERE id = ?1 AND status = 'active'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(actor_from_row).transpose()
    }

    async fn list_movies_for_actor(&self, actor_id: i64) -> Result<Vec<MovieRecord>, sqlx::Error> {
        let rows: Vec<MovieRow> = sqlx::query_as(
            "SELECT m.id, m.title, m.description, m.duration, m.rating, m.img_url, m.genre, \
                    m.status, m.created_at, m.updated_at \
             FROM actors_in_movies l JOIN movies m ON m.id = l.movie_id \
             WHERE l.actor_id = ?1 AND m.status = 'active' ORDER BY m.id",
        )
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(movie_from_row).collect()
    }

    async fn insert_actor(&self, draft: ActorDraft) -> Result<ActorRecord, sqlx::Error> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let result = sqlx::query(
            "INSERT INTO actors (name, country, rating, age, profile_pic, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&draft.name)
        .bind(&draft.country)
        .bind(draft.rating)
        .bind(draft.age)
        .bind(&draft.profile_pic)
        .bind(RecordStatus::Active.as_ref())
        .bind(&stamp)
        .bind(&stamp)
        .execute(&self.pool)
        .await?;

        Ok(ActorRecord {
            id: result.last_insert_rowid(),
            name: draft.name,
            country: draft.country,
            rating: draft.rating,
            age: draft.age,
            profile_pic: draft.profile_pic,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_actor(&self, actor: &ActorRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE actors SET name = ?1, country = ?2, rating = ?3, age = ?4, profile_pic = ?5, \
             updated_at = ?6 WHERE id = ?7",
        )
        .bind(&actor.name)
        .bind(&actor.country)
        .bind(actor.rating)
        .bind(actor.age)
        .bind(&actor.profile_pic)
        .bind(actor.updated_at.to_rfc3339())
        .bind(actor.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_actor_status(&self, id: i64, status: RecordStatus) -> Result<u64, sqlx::Error> {
        let updated_at = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE actors SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status.as_ref())
            .bind(&updated_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
