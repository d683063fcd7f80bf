use chrono::Utc;
use marquee_storage::ObjectStorage;
use tracing::{debug, info};
use validator::Validate;

use crate::entities::{ActorDraft, ActorRecord, ActorStore, ActorWithMovies, RecordStatus};
use crate::error::CatalogError;
use crate::schemas::{ActorPatch, ActorResponse, ImageUpload, NewActor};
use crate::services::{ensure_not_empty, CatalogService};

impl<S: ActorStore, O: ObjectStorage> CatalogService<S, O> {
    /// Every active actor with its movies, `profilePic` resolved to a download URL.
    pub async fn list_actors(&self) -> Result<Vec<ActorResponse>, CatalogError> {
        let actors = self.store.list_active_actors().await?;
        ensure_not_empty(&actors, "There are no actors yet")?;
        debug!(count = actors.len(), "resolving actor profile pictures");

        let references = actors.iter().map(|a| a.actor.profile_pic.clone()).collect();
        let urls = self.resolve_all(references).await?;

        Ok(actors
            .into_iter()
            .zip(urls)
            .map(|(actor, url)| actor.into_resolved(url))
            .collect())
    }

    pub async fn find_actor(&self, id: i64) -> Result<ActorRecord, CatalogError> {
        self.store
            .find_active_actor(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("No actor found with id {id}")))
    }

    /// The loaded actor with its active movies.  The picture is left as the
    /// stored reference.
    pub async fn actor_details(&self, actor: ActorRecord) -> Result<ActorResponse, CatalogError> {
        let movies = self.store.list_movies_for_actor(actor.id).await?;
        Ok(ActorWithMovies { actor, movies }.into_response())
    }

    pub async fn create_actor(
        &self,
        input: NewActor,
        image: ImageUpload,
    ) -> Result<ActorResponse, CatalogError> {
        input.validate()?;
        let profile_pic = self.store_image(image).await?;
        let actor = self
            .store
            .insert_actor(ActorDraft {
                name: input.name,
                country: input.country,
                rating: input.rating,
                age: input.age,
                profile_pic,
            })
            .await?;
        info!(actor_id = actor.id, "actor created");
        Ok(ActorWithMovies {
            actor,
            movies: Vec::new(),
        }
        .into_response())
    }

    pub async fn update_actor(
        &self,
        mut actor: ActorRecord,
        patch: ActorPatch,
    ) -> Result<ActorRecord, CatalogError> {
        patch.validate()?;
        patch.apply(&mut actor);
        actor.updated_at = Utc::now();
        self.store.update_actor(&actor).await?;
        info!(actor_id = actor.id, "actor updated");
        Ok(actor)
    }

    /// Flip the actor to `deleted`.  No transition check: deleting twice is fine.
    pub async fn delete_actor(&self, actor: &ActorRecord) -> Result<(), CatalogError> {
        let affected = self
            .store
            .set_actor_status(actor.id, RecordStatus::Deleted)
            .await?;
        info!(actor_id = actor.id, previous = %actor.status, affected, "actor soft-deleted");
        Ok(())
    }
}
