// Like registry — records and toggles a user's liked locations.
//
// Every mutation refreshes the user's recommendations before returning, so
// a later read always reflects the latest like or unlike.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::db::models::{Liked, LikedLocation, UserId};
use crate::db::Database;
use crate::error::{EngineError, EngineResult};
use crate::recommend::{RecommendSettings, RecommendationStore};

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    /// The like state after the toggle.
    pub liked: bool,
}

#[derive(Clone)]
pub struct LikeRegistry {
    db: Arc<dyn Database>,
    store: RecommendationStore,
}

impl LikeRegistry {
    pub fn new(db: Arc<dyn Database>, settings: RecommendSettings) -> Self {
        let store = RecommendationStore::new(db.clone(), settings);
        Self { db, store }
    }

    /// The recommendation store this registry refreshes.
    pub fn store(&self) -> &RecommendationStore {
        &self.store
    }

    /// Like the location if it isn't liked yet, unlike it otherwise.
    pub async fn toggle(&self, user: &UserId, location_id: i64) -> EngineResult<ToggleOutcome> {
        self.require_location(location_id).await?;

        let liked = if self.db.get_liked(user, location_id).await?.is_some() {
            self.db.delete_liked(user, location_id).await?;
            info!(user = %user, location_id, "Location unliked");
            false
        } else {
            self.db.create_liked(user, location_id, None).await?;
            info!(user = %user, location_id, "Location liked");
            true
        };

        self.store.refresh(user).await?;
        Ok(ToggleOutcome { liked })
    }

    /// Like a location. Liking it twice is an error and changes nothing.
    pub async fn like(&self, user: &UserId, location_id: i64) -> EngineResult<Liked> {
        self.require_location(location_id).await?;

        if self.db.get_liked(user, location_id).await?.is_some() {
            return Err(EngineError::DuplicateLike {
                user: user.clone(),
                location_id,
            });
        }

        let liked = self.db.create_liked(user, location_id, None).await?;
        info!(user = %user, location_id, "Location liked");

        self.store.refresh(user).await?;
        Ok(liked)
    }

    /// Whether the user currently likes the location.
    pub async fn is_liked(&self, user: &UserId, location_id: i64) -> EngineResult<bool> {
        Ok(self.db.get_liked(user, location_id).await?.is_some())
    }

    /// The user's liked locations, in the order they were liked.
    pub async fn liked_locations(&self, user: &UserId) -> EngineResult<Vec<LikedLocation>> {
        Ok(self.db.list_liked_locations(user).await?)
    }

    async fn require_location(&self, location_id: i64) -> EngineResult<()> {
        match self.db.get_location(location_id).await? {
            Some(_) => Ok(()),
            None => Err(EngineError::LocationNotFound(location_id)),
        }
    }
}
