use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;

use crate::entities::{
    actor_from_row, movie_from_row, ActorRecord, ActorRow, MovieDraft, MovieRecord, MovieRow,
    MovieWithActors, RecordStatus, SqliteStore,
};

pub trait MovieStore: Send + Sync + 'static {
    /// All active movies ordered by id, each with its active cast.
    fn list_active_movies(
        &self,
    ) -> impl Future<Output = Result<Vec<MovieWithActors>, sqlx::Error>> + Send;
    fn find_active_movie(
        &self,
        id: i64,
    ) -> impl Future<Output = Result<Option<MovieRecord>, sqlx::Error>> + Send;
    fn list_actors_for_movie(
        &self,
        movie_id: i64,
    ) -> impl Future<Output = Result<Vec<ActorRecord>, sqlx::Error>> + Send;
    /// Insert the movie and link it to `actor_ids` in one transaction.
    fn insert_movie(
        &self,
        draft: MovieDraft,
        actor_ids: &[i64],
    ) -> impl Future<Output = Result<MovieRecord, sqlx::Error>> + Send;
    fn update_movie(
        &self,
        movie: &MovieRecord,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;
    fn set_movie_status(
        &self,
        id: i64,
        status: RecordStatus,
    ) -> impl Future<Output = Result<u64, sqlx::Error>> + Send;
}

impl MovieStore for SqliteStore {
    async fn list_active_movies(&self) -> Result<Vec<MovieWithActors>, sqlx::Error> {
        let movies: Vec<MovieRow> = sqlx::query_as(
            "SELECT id, title, description, duration, rating, img_url, genre, status, created_at, updated_at \
             FROM movies WHERE status = 'active' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let links: Vec<(i64, i64, String, String, f64, i64, String, String, String, String)> =
            sqlx::query_as(
                "SELECT l.movie_id, a.id, a.name, a.country, a.rating, a.age, a.profile_pic, \
                        a.status, a.created_at, a.updated_at \
                 FROM actors_in_movies l \
                 JOIN actors a ON a.id = l.actor_id \
                 JOIN movies m ON m.id = l.movie_id \
                 WHERE a.status = 'active' AND m.status = 'active' \
                 ORDER BY l.movie_id, a.id",
            )
            .fetch_all(&self.pool)
            .await?;

        let mut cast_by_movie: HashMap<i64, Vec<ActorRecord>> = HashMap::new();
        for (movie_id, id, name, country, rating, age, profile_pic, status, c, u) in links {
            let row: ActorRow = (id, name, country, rating, age, profile_pic, status, c, u);
            cast_by_movie
                .entry(movie_id)
                .or_default()
                .push(actor_from_row(row)?);
        }

        movies
            .into_iter()
            .map(|row| {
                let movie = movie_from_row(row)?;
                Ok::<_, sqlx::Error>(MovieWithActors {
                    actors: cast_by_movie.remove(&movie.id).unwrap_or_default(),
                    movie,
                })
            })
            .collect()
    }

    async fn find_active_movie(&self, id: i64) -> Result<Option<MovieRecord>, sqlx::Error> {
        let row: Option<MovieRow> = sqlx::query_as(
            "SELECT id, title, description, duration, rating, img_url, genre, status, created_at, updated_at \
             FROM movies WHERE id = ?1 AND status = 'active'",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(movie_from_row).transpose()
    }

    async fn list_actors_for_movie(&self, movie_id: i64) -> Result<Vec<ActorRecord>, sqlx::Error> {
        let rows: Vec<ActorRow> = sqlx::query_as(
            "SELECT a.id, a.name, a.country, a.rating, a.age, a.profile_pic, a.status, \
                    a.created_at, a.updated_at \
             FROM actors_in_movies l JOIN actors a ON a.id = l.actor_id \
             WHERE l.movie_id = ?1 AND a.status = 'active' ORDER BY a.id",
        )
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(actor_from_row).collect()
    }

    async fn insert_movie(
        &self,
        draft: MovieDraft,
        actor_ids: &[i64],
    ) -> Result<MovieRecord, sqlx::Error> {
        let now = Utc::now();
        let stamp = now.to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO movies (title, description, duration, rating, img_url, genre, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.duration)
        .bind(draft.rating)
        .bind(&draft.img_url)
        .bind(&draft.genre)
        .bind(RecordStatus::Active.as_ref())
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut *tx)
        .await?;
        let movie_id = result.last_insert_rowid();

        for actor_id in actor_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO actors_in_movies (actor_id, movie_id, created_at) \
                 VALUES (?1, ?2, ?3)",
            )
            .bind(*actor_id)
            .bind(movie_id)
            .bind(&stamp)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(MovieRecord {
            id: movie_id,
            title: draft.title,
            description: draft.description,
            duration: draft.duration,
            rating: draft.rating,
            img_url: draft.img_url,
            genre: draft.genre,
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update_movie(&self, movie: &MovieRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE movies SET title = ?1, description = ?2, duration = ?3, rating = ?4, \
             img_url = ?5, genre = ?6, updated_at = ?7 WHERE id = ?8",
        )
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.duration)
        .bind(movie.rating)
        .bind(&movie.img_url)
        .bind(&movie.genre)
        .bind(movie.updated_at.to_rfc3339())
        .bind(movie.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_movie_status(&self, id: i64, status: RecordStatus) -> Result<u64, sqlx::Error> {
        let updated_at = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE movies SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status.as_ref())
            .bind(&updated_at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
