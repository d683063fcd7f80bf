pub mod actor;
pub mod movie;
pub mod status;

pub use actor::{ActorDraft, ActorRecord, ActorWithMovies};
pub use movie::{MovieDraft, MovieRecord, MovieWithActors};
pub use status::RecordStatus;
