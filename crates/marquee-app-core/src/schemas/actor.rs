use marquee_storage::Url;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::{ActorRecord, ActorWithMovies};
use crate::schemas::movie::MovieSummary;

/// An actor as returned by the API.
///
/// In list responses `profile_pic` holds a resolved download URL; in
/// single-record responses it holds the stored asset reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorResponse {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub rating: f64,
    pub age: i64,
    pub profile_pic: String,
    pub created_at: String,
    pub updated_at: String,
    pub movies: Vec<MovieSummary>,
}

/// An actor nested inside a movie response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub rating: f64,
    pub age: i64,
    pub profile_pic: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Validated input for creating an actor.  The picture arrives separately
/// as an [`ImageUpload`](crate::schemas::ImageUpload).
#[derive(Debug, Clone, Validate)]
pub struct NewActor {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "country must not be empty"))]
    pub country: String,
    #[validate(
        range(min = 0.0, message = "rating must not be negative"),
        custom(function = "crate::schemas::finite_rating")
    )]
    pub rating: f64,
    #[validate(range(min = 0, message = "age must not be negative"))]
    pub age: i64,
}

/// Partial update.  Unknown keys (including `status`) are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ActorPatch {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "country must not be empty"))]
    pub country: Option<String>,
    #[validate(
        range(min = 0.0, message = "rating must not be negative"),
        custom(function = "crate::schemas::finite_rating")
    )]
    pub rating: Option<f64>,
    #[validate(range(min = 0, message = "age must not be negative"))]
    pub age: Option<i64>,
    #[validate(custom(function = "crate::schemas::asset_reference"))]
    pub profile_pic: Option<String>,
}

impl ActorPatch {
    /// Overwrite the fields that are present.
    pub fn apply(self, actor: &mut ActorRecord) {
        if let Some(name) = self.name {
            actor.name = name;
        }
        if let Some(country) = self.country {
            actor.country = country;
        }
        if let Some(rating) = self.rating {
            actor.rating = rating;
        }
        if let Some(age) = self.age {
            actor.age = age;
        }
        if let Some(profile_pic) = self.profile_pic {
            actor.profile_pic = profile_pic;
        }
    }
}

impl ActorRecord {
    pub fn to_summary(&self) -> ActorSummary {
        ActorSummary {
            id: self.id,
            name: self.name.clone(),
            country: self.country.clone(),
            rating: self.rating,
            age: self.age,
            profile_pic: self.profile_pic.clone(),
            created_at: self.created_at.to_rfc3339(),
            updated_at: self.updated_at.to_rfc3339(),
        }
    }
}

impl ActorWithMovies {
    /// Response with the stored asset reference left as-is.
    pub fn into_response(self) -> ActorResponse {
        let profile_pic = self.actor.profile_pic.clone();
        self.with_profile_pic(profile_pic)
    }

    /// Response with the asset reference replaced by a download URL.
    pub fn into_resolved(self, url: Url) -> ActorResponse {
        self.with_profile_pic(url.into())
    }

    fn with_profile_pic(self, profile_pic: String) -> ActorResponse {
        let ActorWithMovies { actor, movies } = self;
        ActorResponse {
            id: actor.id,
            name: actor.name,
            country: actor.country,
            rating: actor.rating,
            age: actor.age,
            profile_pic,
            created_at: actor.created_at.to_rfc3339(),
            updated_at: actor.updated_at.to_rfc3339(),
            movies: movies.iter().map(|m| m.to_summary()).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entities::RecordStatus;
    use chrono::Utc;

    fn record() -> ActorRecord {
        let now = Utc::now();
        ActorRecord {
            id: 7,
            name: "Ana".into(),
            country: "Chile".into(),
            rating: 4.0,
            age: 33,
            profile_pic: "imgs/ana.jpg".into(),
            status: RecordStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_rejects_unknown_keys() {
        let err = serde_json::from_str::<ActorPatch>(r#"{"name":"x","status":"active"}"#);
        assert!(err.is_err());
        let ok: ActorPatch = serde_json::from_str(r#"{"profilePic":"imgs/b.jpg"}"#).unwrap();
        assert_eq!(ok.profile_pic.as_deref(), Some("imgs/b.jpg"));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut actor = record();
        ActorPatch {
            age: Some(34),
            ..Default::default()
        }
        .apply(&mut actor);
        assert_eq!(actor.age, 34);
        assert_eq!(actor.name, "Ana");
    }

    #[test]
    fn patch_validation() {
        let bad = ActorPatch {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(ActorPatch::default().validate().is_ok());
    }

    #[test]
    fn new_actor_validation() {
        let actor = NewActor {
            name: "Ana".into(),
            country: String::new(),
            rating: 1.0,
            age: -1,
        };
        let errors = actor.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("country"));
        assert!(fields.contains_key("age"));
    }

    #[test]
    fn resolved_response_uses_camel_case_and_url() {
        let resolved = ActorWithMovies {
            actor: record(),
            movies: vec![],
        }
        .into_resolved(Url::parse("https://x/a").unwrap());
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json["profilePic"], "https://x/a");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("status").is_none());
    }
}
