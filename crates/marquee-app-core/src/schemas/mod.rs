//! Request/response shapes.  Persistence rows never leave the crate as-is;
//! everything a client sees is built here.

pub mod actor;
pub mod movie;
pub mod upload;

pub use actor::{ActorPatch, ActorResponse, ActorSummary, NewActor};
pub use movie::{MoviePatch, MovieResponse, MovieSummary, NewMovie};
pub use upload::ImageUpload;

use std::borrow::Cow;

use validator::ValidationError;

/// `NaN` and infinities pass `range` checks and cannot be stored.
pub(crate) fn finite_rating(rating: &f64) -> Result<(), ValidationError> {
    if rating.is_finite() {
        return Ok(());
    }
    Err(ValidationError::new("finite").with_message(Cow::Borrowed("rating must be a finite number")))
}

/// A patched picture must still be something the resolver accepts.
pub(crate) fn asset_reference(reference: &str) -> Result<(), ValidationError> {
    marquee_storage::validate_reference(reference).map_err(|_| {
        ValidationError::new("asset_reference")
            .with_message(Cow::Borrowed("asset reference must not be blank"))
    })
}
