use chrono::Utc;
use marquee_storage::ObjectStorage;
use tracing::{debug, info};
use validator::Validate;

use crate::entities::{
    ActorStore, MovieDraft, MovieRecord, MovieStore, MovieWithActors, RecordStatus,
};
use crate::error::CatalogError;
use crate::schemas::{ImageUpload, MoviePatch, MovieResponse, NewMovie};
use crate::services::{ensure_not_empty, CatalogService};

impl<S: ActorStore + MovieStore, O: ObjectStorage> CatalogService<S, O> {
    /// Every active movie with its cast, `imgUrl` resolved to a download URL.
    pub async fn list_movies(&self) -> Result<Vec<MovieResponse>, CatalogError> {
        let movies = self.store.list_active_movies().await?;
        ensure_not_empty(&movies, "There are no movies yet")?;
        debug!(count = movies.len(), "resolving movie posters");

        let references = movies.iter().map(|m| m.movie.img_url.clone()).collect();
        let urls = self.resolve_all(references).await?;

        Ok(movies
            .into_iter()
            .zip(urls)
            .map(|(movie, url)| movie.into_resolved(url))
            .collect())
    }

    pub async fn find_movie(&self, id: i64) -> Result<MovieRecord, CatalogError> {
        self.store
            .find_active_movie(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("No movie found with id {id}")))
    }

    pub async fn movie_details(&self, movie: MovieRecord) -> Result<MovieResponse, CatalogError> {
        let actors = self.store.list_actors_for_movie(movie.id).await?;
        Ok(MovieWithActors { movie, actors }.into_response())
    }

    /// Validate, check the cast, upload the poster, then insert.
    pub async fn create_movie(
        &self,
        input: NewMovie,
        image: ImageUpload,
    ) -> Result<MovieResponse, CatalogError> {
        input.validate()?;
        for &actor_id in &input.actor_ids {
            if self.store.find_active_actor(actor_id).await?.is_none() {
                return Err(CatalogError::ValidationFailed(format!(
                    "actor {actor_id} does not exist"
                )));
            }
        }

        let img_url = self.store_image(image).await?;
        let movie = self
            .store
            .insert_movie(
                MovieDraft {
                    title: input.title,
                    description: input.description,
                    duration: input.duration,
                    rating: input.rating,
                    img_url,
                    genre: input.genre,
                },
                &input.actor_ids,
            )
            .await?;
        info!(movie_id = movie.id, cast = input.actor_ids.len(), "movie created");

        let actors = self.store.list_actors_for_movie(movie.id).await?;
        Ok(MovieWithActors { movie, actors }.into_response())
    }

    pub async fn update_movie(
        &self,
        mut movie: MovieRecord,
        patch: MoviePatch,
    ) -> Result<MovieRecord, CatalogError> {
        patch.validate()?;
        patch.apply(&mut movie);
        movie.updated_at = Utc::now();
        self.store.update_movie(&movie).await?;
        info!(movie_id = movie.id, "movie updated");
        Ok(movie)
    }

    /// Flip the movie to `deleted`.  No transition check: deleting twice is fine.
    pub async fn delete_movie(&self, movie: &MovieRecord) -> Result<(), CatalogError> {
        let affected = self
            .store
            .set_movie_status(movie.id, RecordStatus::Deleted)
            .await?;
        info!(movie_id = movie.id, previous = %movie.status, affected, "movie soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use bytes::Bytes;

    use super::*;
    use crate::entities::{ActorDraft, ActorRecord, SqliteStore};
    use crate::error::ErrorKind;
    use crate::services::testing::ScriptedStorage;

    fn draft(title: &str, img_url: &str) -> MovieDraft {
        MovieDraft {
            title: title.into(),
            description: "a film".into(),
            duration: 110,
            rating: 3.5,
            img_url: img_url.into(),
            genre: "drama".into(),
        }
    }

    async fn actor(store: &SqliteStore, name: &str) -> ActorRecord {
        store
            .insert_actor(ActorDraft {
                name: name.into(),
                country: "Italy".into(),
                rating: 4.0,
                age: 50,
                profile_pic: format!("imgs/{name}.jpg"),
            })
            .await
            .unwrap()
    }

    fn new_movie(actor_ids: Vec<i64>) -> NewMovie {
        NewMovie {
            title: "Roma".into(),
            description: "1970s Mexico City".into(),
            duration: 135,
            rating: 4.8,
            genre: "drama".into(),
            actor_ids,
        }
    }

    fn poster() -> ImageUpload {
        ImageUpload {
            file_name: "roma.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: Bytes::from_static(b"jpeg"),
        }
    }

    #[tokio::test]
    async fn list_keeps_order_and_raw_cast_pictures() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let cast = actor(&store, "a").await;
        let m1 = store.insert_movie(draft("m1", "m1.jpg"), &[cast.id]).await.unwrap();
        let m2 = store.insert_movie(draft("m2", "m2.jpg"), &[]).await.unwrap();
        let m3 = store.insert_movie(draft("m3", "m3.jpg"), &[]).await.unwrap();
        let storage = ScriptedStorage::new()
            .resolves("m1.jpg", "https://x/1", 60)
            .resolves("m2.jpg", "https://x/2", 30)
            .resolves("m3.jpg", "https://x/3", 0);
        let catalog = CatalogService::new(Arc::new(store), Arc::new(storage));

        let listed = catalog.list_movies().await.unwrap();
        let got: Vec<(i64, &str)> = listed.iter().map(|m| (m.id, m.img_url.as_str())).collect();
        assert_eq!(
            got,
            vec![(m1.id, "https://x/1"), (m2.id, "https://x/2"), (m3.id, "https://x/3")]
        );
        // Only the movie's own poster is resolved.
        assert_eq!(listed[0].actors[0].profile_pic, "imgs/a.jpg");
        assert_eq!(catalog.storage().calls(), 3);
    }

    #[tokio::test]
    async fn list_fails_as_a_whole() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        store.insert_movie(draft("m1", "m1.jpg"), &[]).await.unwrap();
        store.insert_movie(draft("m2", "gone.jpg"), &[]).await.unwrap();
        let storage = ScriptedStorage::new()
            .resolves("m1.jpg", "https://x/1", 0)
            .fails("gone.jpg", 0);
        let catalog = CatalogService::new(Arc::new(store), Arc::new(storage));

        let err = catalog.list_movies().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamFailure);
    }

    #[tokio::test]
    async fn empty_and_all_deleted_are_not_found() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));
        assert_eq!(catalog.list_movies().await.unwrap_err().kind(), ErrorKind::NotFound);

        let movie = catalog.store().insert_movie(draft("m", "m.jpg"), &[]).await.unwrap();
        catalog.delete_movie(&movie).await.unwrap();
        catalog.delete_movie(&movie).await.unwrap();

        let err = catalog.list_movies().await.unwrap_err();
        assert_eq!(err.to_string(), "not found: There are no movies yet");
        assert_eq!(catalog.find_movie(movie.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn create_links_existing_actors() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let a = actor(&store, "a").await;
        let b = actor(&store, "b").await;
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));

        let created = catalog.create_movie(new_movie(vec![b.id, a.id]), poster()).await.unwrap();
        assert!(created.img_url.ends_with("-roma.jpg"));
        let cast: Vec<i64> = created.actors.iter().map(|x| x.id).collect();
        assert_eq!(cast, vec![a.id, b.id]);

        let details = catalog
            .movie_details(catalog.find_movie(created.id).await.unwrap())
            .await
            .unwrap();
        assert_eq!(details.actors.len(), 2);
        assert_eq!(details.img_url, created.img_url);
    }

    #[tokio::test]
    async fn create_rejects_unknown_actors_before_uploading() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));

        let err = catalog.create_movie(new_movie(vec![42]), poster()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(catalog.storage().uploads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_non_images() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));

        let text = ImageUpload {
            content_type: "text/plain".into(),
            ..poster()
        };
        let err = catalog.create_movie(new_movie(vec![]), text).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn update_rejects_invalid_patch() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let movie = store.insert_movie(draft("m", "m.jpg"), &[]).await.unwrap();
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));

        let bad = MoviePatch {
            duration: Some(0),
            ..Default::default()
        };
        let err = catalog.update_movie(movie.clone(), bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let good = MoviePatch {
            genre: Some("thriller".into()),
            ..Default::default()
        };
        let updated = catalog.update_movie(movie, good).await.unwrap();
        assert_eq!(updated.genre, "thriller");
        assert_eq!(catalog.find_movie(updated.id).await.unwrap().genre, "thriller");
    }

    #[tokio::test]
    async fn non_finite_ratings_are_validation_failures() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));

        let mut input = new_movie(Vec::new());
        input.rating = f64::NAN;
        let err = catalog.create_movie(input, poster()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert!(catalog.storage().uploads.lock().unwrap().is_empty());

        let movie = catalog.store().insert_movie(draft("m", "m.jpg"), &[]).await.unwrap();
        let patch = MoviePatch {
            rating: Some(f64::NEG_INFINITY),
            ..Default::default()
        };
        let err = catalog.update_movie(movie, patch).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    }

    #[tokio::test]
    async fn blank_poster_patch_is_rejected() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let movie = store.insert_movie(draft("m", "m.jpg"), &[]).await.unwrap();
        let storage = ScriptedStorage::new().resolves("m.jpg", "https://x/m", 0);
        let catalog = CatalogService::new(Arc::new(store), Arc::new(storage));

        let patch: MoviePatch = serde_json::from_str(r#"{"imgUrl": "\t "}"#).unwrap();
        let err = catalog.update_movie(movie, patch).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let listed = catalog.list_movies().await.unwrap();
        assert_eq!(listed[0].img_url, "https://x/m");
    }

    #[tokio::test]
    async fn delete_does_not_trust_the_loaded_status() {
        let store = SqliteStore::connect_in_memory().await.unwrap();
        let movie = store.insert_movie(draft("m", "m.jpg"), &[]).await.unwrap();
        let catalog = CatalogService::new(Arc::new(store), Arc::new(ScriptedStorage::new()));

        let stale = MovieRecord {
            status: RecordStatus::Deleted,
            ..movie.clone()
        };
        catalog.delete_movie(&stale).await.unwrap();
        assert_eq!(catalog.find_movie(movie.id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
