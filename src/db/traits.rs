// Database trait — backend-agnostic async interface for all DB operations.
//
// Implementor: SqliteDatabase (wraps rusqlite). The methods are async so a
// native async backend can sit behind the same interface later.
//
// The trait mirrors the queries.rs function signatures. The recommendation
// engine depends only on this trait, never on a concrete connection.

use anyhow::Result;
use async_trait::async_trait;

use super::models::{Liked, LikedLocation, Location, NewLocation, Recommendation, UserId};

#[async_trait]
pub trait Database: Send + Sync {
    // --- Lifecycle ---

    /// Count the number of user-created tables in the database.
    async fn table_count(&self) -> Result<i64>;

    // --- Locations ---

    /// Insert a location and return its id.
    async fn insert_location(&self, location: &NewLocation) -> Result<i64>;

    /// Insert many locations atomically and return their ids.
    async fn insert_locations(&self, locations: &[NewLocation]) -> Result<Vec<i64>>;

    /// All locations, ordered by id.
    async fn list_locations(&self) -> Result<Vec<Location>>;

    /// Look up a single location.
    async fn get_location(&self, id: i64) -> Result<Option<Location>>;

    async fn count_locations(&self) -> Result<i64>;

    // --- Likes ---

    /// A user's likes, oldest first.
    async fn list_liked(&self, user: &UserId) -> Result<Vec<Liked>>;

    /// The like for (user, location), if any.
    async fn get_liked(&self, user: &UserId, location_id: i64) -> Result<Option<Liked>>;

    /// Record a like. An absent or empty description is snapshotted from
    /// the location.
    async fn create_liked(
        &self,
        user: &UserId,
        location_id: i64,
        description: Option<&str>,
    ) -> Result<Liked>;

    /// Remove a like. Returns whether one existed.
    async fn delete_liked(&self, user: &UserId, location_id: i64) -> Result<bool>;

    /// A user's liked locations joined with their location rows.
    async fn list_liked_locations(&self, user: &UserId) -> Result<Vec<LikedLocation>>;

    async fn count_liked(&self) -> Result<i64>;

    // --- Recommendations ---

    /// The stored recommendation for a user, locations in rank order.
    async fn get_recommendation(&self, user: &UserId) -> Result<Option<Recommendation>>;

    /// Upsert the user's recommendation with exactly these locations.
    async fn replace_recommendation(&self, user: &UserId, location_ids: &[i64]) -> Result<()>;

    /// Delete the user's recommendation. Returns whether one existed.
    async fn delete_recommendation(&self, user: &UserId) -> Result<bool>;

    async fn count_recommendations(&self) -> Result<i64>;
}
