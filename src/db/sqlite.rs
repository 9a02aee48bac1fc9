// SqliteDatabase — rusqlite backend implementing the Database trait.
//
// The Connection is wrapped in tokio::sync::Mutex because Connection is !Sync.
// Trait methods lock the mutex, do synchronous rusqlite work, and return.
// The lock is never held across .await points.

use anyhow::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use tokio::sync::Mutex;

use super::models::{Liked, LikedLocation, Location, NewLocation, Recommendation, UserId};
use super::queries;
use super::traits::Database;

pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl SqliteDatabase {
    /// Wrap an already-opened rusqlite Connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn table_count(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        super::schema::table_count(&conn)
    }

    async fn insert_location(&self, location: &NewLocation) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::insert_location(&conn, location)
    }

    async fn insert_locations(&self, locations: &[NewLocation]) -> Result<Vec<i64>> {
        let conn = self.conn.lock().await;
        queries::insert_locations(&conn, locations)
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let conn = self.conn.lock().await;
        queries::list_locations(&conn)
    }

    async fn get_location(&self, id: i64) -> Result<Option<Location>> {
        let conn = self.conn.lock().await;
        queries::get_location(&conn, id)
    }

    async fn count_locations(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::count_locations(&conn)
    }

    async fn list_liked(&self, user: &UserId) -> Result<Vec<Liked>> {
        let conn = self.conn.lock().await;
        queries::list_liked(&conn, user)
    }

    async fn get_liked(&self, user: &UserId, location_id: i64) -> Result<Option<Liked>> {
        let conn = self.conn.lock().await;
        queries::get_liked(&conn, user, location_id)
    }

    async fn create_liked(
        &self,
        user: &UserId,
        location_id: i64,
        description: Option<&str>,
    ) -> Result<Liked> {
        let conn = self.conn.lock().await;
        queries::create_liked(&conn, user, location_id, description)
    }

    async fn delete_liked(&self, user: &UserId, location_id: i64) -> Result<bool> {
        let conn = self.conn.lock().await;
        queries::delete_liked(&conn, user, location_id)
    }

    async fn list_liked_locations(&self, user: &UserId) -> Result<Vec<LikedLocation>> {
        let conn = self.conn.lock().await;
        queries::list_liked_locations(&conn, user)
    }

    async fn count_liked(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::count_liked(&conn)
    }

    async fn get_recommendation(&self, user: &UserId) -> Result<Option<Recommendation>> {
        let conn = self.conn.lock().await;
        queries::get_recommendation(&conn, user)
    }

    async fn replace_recommendation(&self, user: &UserId, location_ids: &[i64]) -> Result<()> {
        let conn = self.conn.lock().await;
        queries::replace_recommendation(&conn, user, location_ids)
    }

    async fn delete_recommendation(&self, user: &UserId) -> Result<bool> {
        let conn = self.conn.lock().await;
        queries::delete_recommendation(&conn, user)
    }

    async fn count_recommendations(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        queries::count_recommendations(&conn)
    }
}
