// Database schema — table creation and migrations.
//
// A `schema_version` table records which schema versions have been applied.
// Version 1 is the base schema below.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// This is idempotent — safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        -- Tracks schema version for future migrations
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Travel locations, filled by `wayfarer import`
        CREATE TABLE IF NOT EXISTS locations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            zone TEXT,
            state TEXT,
            city TEXT,
            entry_price INTEGER NOT NULL DEFAULT 0 CHECK (entry_price >= 0),
            description TEXT NOT NULL
        );

        -- A user's liked locations, with the description as it was at like time
        CREATE TABLE IF NOT EXISTS liked (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            description TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (user_id, location_id)
        );

        -- At most one cached recommendation per user
        CREATE TABLE IF NOT EXISTS recommendations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE,
            updated_at TEXT NOT NULL
        );

        -- The recommended locations, in ranker order
        CREATE TABLE IF NOT EXISTS recommendation_locations (
            recommendation_id INTEGER NOT NULL REFERENCES recommendations(id) ON DELETE CASCADE,
            location_id INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            rank INTEGER NOT NULL,
            PRIMARY KEY (recommendation_id, location_id)
        );

        CREATE INDEX IF NOT EXISTS idx_liked_user
            ON liked(user_id);

        CREATE INDEX IF NOT EXISTS idx_recommendation_locations_rank
            ON recommendation_locations(recommendation_id, rank);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}

/// Count the number of tables in the database (useful for init confirmation).
pub fn table_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}
