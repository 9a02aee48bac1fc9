// Engine errors.
//
// Only two conditions are raised by the engine itself. Everything coming
// out of the storage layer is carried through unchanged as `Storage`.
// "Not enough data" is never an error: it's an empty or fallback result.

use thiserror::Error;

use crate::db::models::UserId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Location {0} not found")]
    LocationNotFound(i64),

    #[error("User {user} already liked location {location_id}")]
    DuplicateLike { user: UserId, location_id: i64 },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
