// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the engine. They're separate from
// the database queries so other modules can use them without depending on
// rusqlite directly.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque user identity. The engine only compares it; authentication is
/// somebody else's job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A travel location, created by bulk import and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: Option<String>,
    pub zone: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub entry_price: i64,
    /// The only field the recommender looks at.
    pub description: String,
}

impl Location {
    /// Display name, falling back to the id for unnamed rows.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Location #{}", self.id))
    }
}

/// A location as it comes out of the importer, before it has an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLocation {
    pub name: Option<String>,
    pub zone: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub entry_price: i64,
    pub description: String,
}

/// A user's like of a location.
///
/// `description` is a snapshot of the location's description taken when the
/// like was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liked {
    pub id: i64,
    pub user: UserId,
    pub location_id: i64,
    pub description: String,
}

/// A liked location joined with its current location row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikedLocation {
    /// Row id of the like; increases with like order.
    pub liked_id: i64,
    pub location: Location,
}

/// The cached recommendation set for one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub user: UserId,
    /// Best match first.
    pub locations: Vec<Location>,
    pub updated_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn location_ids(&self) -> Vec<i64> {
        self.locations.iter().map(|l| l.id).collect()
    }
}
