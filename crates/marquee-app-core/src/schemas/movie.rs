use marquee_storage::Url;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{MovieRecord, MovieWithActors};
use crate::schemas::actor::ActorSummary;

/// A movie as returned by the API.
///
/// In list responses `img_url` holds a resolved download URL; in
/// single-record responses it holds the stored asset reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: i64,
    pub img_url: String,
    pub rating: f64,
    pub genre: String,
    pub created_at: String,
    pub updated_at: String,
    pub actors: Vec<ActorSummary>,
}

/// A movie nested inside an actor response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration: i64,
    pub img_url: String,
    pub rating: f64,
    pub genre: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Validate)]
pub struct NewMovie {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration: i64,
    #[validate(
        range(min = 0.0, message = "rating must not be negative"),
        custom(function = "crate::schemas::finite_rating")
    )]
    pub rating: f64,
    #[validate(length(min = 1, message = "genre must not be empty"))]
    pub genre: String,
    /// Existing active actors to link to the new movie.
    pub actor_ids: Vec<i64>,
}

/// Partial update.  Unknown keys (including `status`) are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoviePatch {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub duration: Option<i64>,
    #[validate(
        range(min = 0.0, message = "rating must not be negative"),
        custom(function = "crate::schemas::finite_rating")
    )]
    pub rating: Option<f64>,
    #[validate(custom(function = "crate::schemas::asset_reference"))]
    pub img_url: Option<String>,
    #[validate(length(min = 1, message = "genre must not be empty"))]
    pub genre: Option<String>,
}

impl MoviePatch {
    pub fn apply(self, movie: &mut MovieRecord) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if let Some(description) = self.description {
            movie.description = description;
        }
        if let Some(duration) = self.duration {
            movie.duration = duration;
        }
        if let Some(rating) = self.rating {
            movie.rating = rating;
        }
        if let Some(img_url) = self.img_url {
            movie.img_url = img_url;
        }
        if let Some(genre) = self.genre {
            movie.genre = genre;
        }
    }
}

impl MovieRecord {
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            duration: self.duration,
            img_url: self.img_url.clone(),
            rating: self.rating,
            genre: self.genre.clone(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

impl MovieWithActors {
    pub fn into_response(self) -> MovieResponse {
        let img_url = self.movie.img_url.clone();
        self.with_img_url(img_url)
    }

    pub fn into_resolved(self, url: Url) -> MovieResponse {
        self.with_img_url(url.into())
    }

    fn with_img_url(self, img_url: String) -> MovieResponse {
        let MovieWithActors { movie, actors } = self;
        MovieResponse {
            id: movie.id,
            title: movie.title,
            description: movie.description,
            duration: movie.duration,
            img_url,
            rating: movie.rating,
            genre: movie.genre,
            created_at: movie.created_at.to_rfc3339(),
            updated_at: movie.updated_at.to_rfc3339(),
            actors: actors.iter().map(|a| a.to_summary()).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn patch_uses_img_url_key() {
        let patch: MoviePatch = serde_json::from_str(r#"{"imgUrl":"imgs/new.jpg","genre":"noir"}"#).unwrap();
        assert_eq!(patch.img_url.as_deref(), Some("imgs/new.jpg"));
        assert!(serde_json::from_str::<MoviePatch>(r#"{"img":"imgs/new.jpg"}"#).is_err());
    }

    #[test]
    fn zero_duration_is_invalid() {
        let patch = MoviePatch {
            duration: Some(0),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
