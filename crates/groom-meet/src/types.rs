//! Types for the Meet directory client.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Meet space as returned by `spaces.get` / `spaces.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Canonical resource name (`spaces/{id}`).
    pub name: String,
    /// Joinable URI (`https://meet.google.com/abc-mnop-xyz`).
    #[serde(default)]
    pub meeting_uri: Option<String>,
    /// Meeting code (`abc-mnop-xyz`).
    #[serde(default)]
    pub meeting_code: Option<String>,
    /// The conference currently running in the space, if any.
    #[serde(default)]
    pub active_conference: Option<ActiveConferenceRef>,
}

/// Pointer to the conference currently running in a space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveConferenceRef {
    /// Resource name of the conference record.
    pub conference_record: String,
}

/// A conference record (one meeting instance in a space).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceRecord {
    /// Resource name (`conferenceRecords/{id}`).
    pub name: String,
    /// Space the conference took place in (`spaces/{id}`).
    pub space: String,
    /// When the conference started.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// When the conference ended; `None` while it is still running.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

/// A participant of a conference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Resource name (`conferenceRecords/{id}/participants/{id}`).
    pub name: String,
    /// When the participant first joined.
    #[serde(default)]
    pub earliest_start_time: Option<DateTime<Utc>>,
    /// When the participant last left; `None` while still connected.
    #[serde(default)]
    pub latest_end_time: Option<DateTime<Utc>>,
}

/// A running conference together with its current participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveConference {
    /// The conference record.
    pub record: ConferenceRecord,
    /// Participants still connected.
    pub participants: Vec<Participant>,
}

impl ActiveConference {
    /// Space the conference is running in.
    #[must_use]
    pub fn space(&self) -> &str {
        &self.record.space
    }

    /// Number of connected participants.
    #[must_use]
    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }
}

/// Configuration for the Meet directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// How long a space lookup stays cached, in seconds.
    #[serde(default = "DirectoryConfig::default_space_ttl")]
    pub space_ttl_seconds: u64,

    /// How long the active-conference listing stays cached, in seconds.
    #[serde(default = "DirectoryConfig::default_conference_ttl")]
    pub conference_ttl_seconds: u64,
}

impl DirectoryConfig {
    const fn default_space_ttl() -> u64 {
        3600 // 1 hour
    }

    const fn default_conference_ttl() -> u64 {
        5
    }

    /// Get the space TTL as a `Duration`.
    #[must_use]
    pub fn space_ttl(&self) -> Duration {
        Duration::from_secs(self.space_ttl_seconds)
    }

    /// Get the conference listing TTL as a `Duration`.
    #[must_use]
    pub fn conference_ttl(&self) -> Duration {
        Duration::from_secs(self.conference_ttl_seconds)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            space_ttl_seconds: Self::default_space_ttl(),
            conference_ttl_seconds: Self::default_conference_ttl(),
        }
    }
}
