//! Domain types stored in the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A room record stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    /// Surrogate key.
    pub id: i64,
    /// Unique routing slug. Immutable once created.
    pub slug: String,
    /// Space reference: a legacy meeting code or a `spaces/{id}` name.
    pub space_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    /// Routing slug.
    pub slug: String,
    /// Space reference.
    pub space_id: String,
}

impl NewRoom {
    /// Create a new insert payload.
    #[must_use]
    pub fn new(slug: impl Into<String>, space_id: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            space_id: space_id.into(),
        }
    }
}
