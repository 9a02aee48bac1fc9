// Database queries — CRUD operations for all tables.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the app clean Rust interfaces.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{Liked, LikedLocation, Location, NewLocation, Recommendation, UserId};

const LOCATION_COLUMNS: &str = "id, name, zone, state, city, entry_price, description";

/// Map a row selected with LOCATION_COLUMNS (starting at `offset`).
fn location_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        zone: row.get(offset + 2)?,
        state: row.get(offset + 3)?,
        city: row.get(offset + 4)?,
        entry_price: row.get(offset + 5)?,
        description: row.get(offset + 6)?,
    })
}

// --- Locations ---

/// Insert a location and return its new id.
pub fn insert_location(conn: &Connection, location: &NewLocation) -> Result<i64> {
    conn.execute(
        "INSERT INTO locations (name, zone, state, city, entry_price, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            location.name,
            location.zone,
            location.state,
            location.city,
            location.entry_price,
            location.description,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Insert a batch of locations in one transaction. Either every row lands
/// or none does. Returns the new ids in input order.
pub fn insert_locations(conn: &Connection, locations: &[NewLocation]) -> Result<Vec<i64>> {
    let tx = conn.unchecked_transaction()?;

    let mut ids = Vec::with_capacity(locations.len());
    for location in locations {
        ids.push(insert_location(&tx, location)?);
    }

    tx.commit()?;
    Ok(ids)
}

/// All locations in id order. This order is the corpus order.
pub fn list_locations(conn: &Connection) -> Result<Vec<Location>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY id"
    ))?;
    let rows = stmt.query_map([], |row| location_from_row(row, 0))?;

    let mut locations = Vec::new();
    for row in rows {
        locations.push(row?);
    }
    Ok(locations)
}

pub fn get_location(conn: &Connection, id: i64) -> Result<Option<Location>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = ?1"
    ))?;
    let result = stmt
        .query_row(params![id], |row| location_from_row(row, 0))
        .optional()?;
    Ok(result)
}

pub fn count_locations(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
    Ok(count)
}

// --- Likes ---

fn liked_from_row(row: &Row<'_>) -> rusqlite::Result<Liked> {
    Ok(Liked {
        id: row.get(0)?,
        user: UserId::new(row.get::<_, String>(1)?),
        location_id: row.get(2)?,
        description: row.get(3)?,
    })
}

/// A user's likes, oldest first.
pub fn list_liked(conn: &Connection, user: &UserId) -> Result<Vec<Liked>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, location_id, description
         FROM liked
         WHERE user_id = ?1
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user.as_str()], liked_from_row)?;

    let mut liked = Vec::new();
    for row in rows {
        liked.push(row?);
    }
    Ok(liked)
}

pub fn get_liked(conn: &Connection, user: &UserId, location_id: i64) -> Result<Option<Liked>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, location_id, description
         FROM liked
         WHERE user_id = ?1 AND location_id = ?2",
    )?;
    let result = stmt
        .query_row(params![user.as_str(), location_id], liked_from_row)
        .optional()?;
    Ok(result)
}

/// Record a like. When `description` is absent or empty the location's
/// current description is copied in.
pub fn create_liked(
    conn: &Connection,
    user: &UserId,
    location_id: i64,
    description: Option<&str>,
) -> Result<Liked> {
    let inserted = conn.execute(
        "INSERT INTO liked (user_id, location_id, description)
         SELECT ?1, id, COALESCE(NULLIF(?3, ''), description)
         FROM locations
         WHERE id = ?2",
        params![user.as_str(), location_id, description],
    )?;
    if inserted == 0 {
        anyhow::bail!("Location {location_id} not found");
    }

    let id = conn.last_insert_rowid();
    let liked = conn.query_row(
        "SELECT id, user_id, location_id, description FROM liked WHERE id = ?1",
        params![id],
        liked_from_row,
    )?;
    Ok(liked)
}

/// Remove a like. Returns whether a row was deleted.
pub fn delete_liked(conn: &Connection, user: &UserId, location_id: i64) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM liked WHERE user_id = ?1 AND location_id = ?2",
        params![user.as_str(), location_id],
    )?;
    Ok(deleted > 0)
}

/// A user's liked locations joined with the location rows, like order.
pub fn list_liked_locations(conn: &Connection, user: &UserId) -> Result<Vec<LikedLocation>> {
    let mut stmt = conn.prepare(
        "SELECT lk.id, l.id, l.name, l.zone, l.state, l.city, l.entry_price, l.description
         FROM liked lk
         JOIN locations l ON l.id = lk.location_id
         WHERE lk.user_id = ?1
         ORDER BY lk.id",
    )?;
    let rows = stmt.query_map(params![user.as_str()], |row| {
        Ok(LikedLocation {
            liked_id: row.get(0)?,
            location: location_from_row(row, 1)?,
        })
    })?;

    let mut liked = Vec::new();
    for row in rows {
        liked.push(row?);
    }
    Ok(liked)
}

pub fn count_liked(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM liked", [], |row| row.get(0))?;
    Ok(count)
}

// --- Recommendations ---

/// Load a user's recommendation with its locations in rank order.
pub fn get_recommendation(conn: &Connection, user: &UserId) -> Result<Option<Recommendation>> {
    let header: Option<(i64, chrono::DateTime<Utc>)> = conn
        .query_row(
            "SELECT id, updated_at FROM recommendations WHERE user_id = ?1",
            params![user.as_str()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((recommendation_id, updated_at)) = header else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT l.id, l.name, l.zone, l.state, l.city, l.entry_price, l.description
         FROM recommendation_locations rl
         JOIN locations l ON l.id = rl.location_id
         WHERE rl.recommendation_id = ?1
         ORDER BY rl.rank",
    )?;
    let rows = stmt.query_map(params![recommendation_id], |row| location_from_row(row, 0))?;

    let mut locations = Vec::new();
    for row in rows {
        locations.push(row?);
    }

    Ok(Some(Recommendation {
        user: user.clone(),
        locations,
        updated_at,
    }))
}

/// Upsert the user's recommendation and replace its location set with
/// exactly `location_ids`, in that order. Runs as one transaction.
pub fn replace_recommendation(conn: &Connection, user: &UserId, location_ids: &[i64]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute(
        "INSERT INTO recommendations (user_id, updated_at)
         VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET updated_at = ?2",
        params![user.as_str(), Utc::now()],
    )?;
    let recommendation_id: i64 = tx.query_row(
        "SELECT id FROM recommendations WHERE user_id = ?1",
        params![user.as_str()],
        |row| row.get(0),
    )?;

    tx.execute(
        "DELETE FROM recommendation_locations WHERE recommendation_id = ?1",
        params![recommendation_id],
    )?;
    {
        let mut insert = tx.prepare(
            "INSERT INTO recommendation_locations (recommendation_id, location_id, rank)
             VALUES (?1, ?2, ?3)",
        )?;
        for (rank, location_id) in location_ids.iter().enumerate() {
            insert.execute(params![recommendation_id, location_id, rank as i64])?;
        }
    }

    tx.commit()?;
    Ok(())
}

/// Delete a user's recommendation. Returns whether one existed.
pub fn delete_recommendation(conn: &Connection, user: &UserId) -> Result<bool> {
    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "DELETE FROM recommendation_locations
         WHERE recommendation_id IN (SELECT id FROM recommendations WHERE user_id = ?1)",
        params![user.as_str()],
    )?;
    let deleted = tx.execute(
        "DELETE FROM recommendations WHERE user_id = ?1",
        params![user.as_str()],
    )?;
    tx.commit()?;
    Ok(deleted > 0)
}

pub fn count_recommendations(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM recommendations", [], |row| row.get(0))?;
    Ok(count)
}
