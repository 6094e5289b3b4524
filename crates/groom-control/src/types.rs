//! Request and response types for room operations.

use groom_store::Room;
use serde::{Deserialize, Serialize};

/// A room annotated with the state of its meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomOccupancy {
    /// The room.
    #[serde(flatten)]
    pub room: Room,
    /// Whether a conference is running in the room's space.
    pub is_occupied: bool,
    /// Connected participants; `0` when the room is free.
    pub participant_count: usize,
}

/// Request to create a room.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomRequest {
    /// Routing slug for the new room.
    pub slug: String,
}

/// Request to update a room.
///
/// The slug is immutable; if present it must equal the stored one.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoomRequest {
    /// New space reference.
    pub space_id: String,
    /// Current slug, echoed back by clients that send the whole record.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Outcome of a legacy migration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Rows visited.
    pub scanned: usize,
    /// Rows rewritten to a canonical space name.
    pub migrated: usize,
    /// Rows already canonical or without a space.
    pub skipped: usize,
    /// Rows whose lookup or update failed.
    pub failed: usize,
}

/// Reachability of the gateway's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// The room store answered a ping.
    pub database: bool,
    /// The meeting provider answered a ping.
    pub provider: bool,
}

impl HealthReport {
    /// Returns `true` when every dependency is reachable.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.database && self.provider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_slug_is_optional() {
        let req: UpdateRoomRequest = serde_json::from_str(r#"{"space_id": "spaces/x"}"#).unwrap();
        assert!(req.slug.is_none());
    }

    #[test]
    fn health_requires_both() {
        let report = HealthReport {
            database: true,
            provider: false,
        };
        assert!(!report.is_healthy());
    }
}
