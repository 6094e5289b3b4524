//! Google Meet directory client for groom.
//!
//! This crate provides the [`MeetApi`] provider boundary, the
//! [`GoogleMeetApi`] REST implementation and the caching [`MeetDirectory`]
//! the rest of the gateway talks to. It handles:
//!
//! - Service-account credentials with domain-wide delegation
//! - Space lookup and creation
//! - Listing running conferences together with their participants
//! - Short-TTL caching so page renders don't exhaust provider quotas
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Room Resolver                 │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │                 MeetDirectory                 │
//! │   ┌──────────────┐     ┌──────────────────┐  │
//! │   │ Space cache  │     │ Conference cache │  │
//! │   │ (1 h)        │     │ (5 s)            │  │
//! │   └──────────────┘     └──────────────────┘  │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │        GoogleMeetApi  ──  TokenSource         │
//! └──────────────────────────────────────────────┘
//!                        │
//!                        ▼
//!              meet.googleapis.com/v2
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use groom_meet::{
//!     DirectoryConfig, GoogleMeetApi, MeetDirectory, ServiceAccountKey,
//!     ServiceAccountTokenSource,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = ServiceAccountKey::from_file("./service_account.json")?;
//! let tokens = Arc::new(ServiceAccountTokenSource::new(key, "admin@example.com")?);
//! let api = Arc::new(GoogleMeetApi::new(tokens)?);
//! let directory = MeetDirectory::new(api, DirectoryConfig::default());
//!
//! let space = directory.get_space("spaces/jQCFfuBOdN5z").await?;
//! println!("join at {:?}", space.meeting_uri);
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! Enable the `test-utils` feature to use [`MockMeetApi`], which keeps spaces
//! and conferences in memory and counts provider calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod cache;
pub mod credentials;
pub mod directory;
pub mod error;
pub mod google;
pub mod types;

pub use api::{MeetApi, ACTIVE_CONFERENCE_FILTER, CONNECTED_PARTICIPANT_FILTER};
pub use cache::{MemoryCache, TtlCache};
pub use credentials::{
    ServiceAccountKey, ServiceAccountTokenSource, StaticTokenSource, TokenSource,
};
pub use directory::MeetDirectory;
pub use error::{MeetError, Result};
pub use google::{GoogleMeetApi, MEET_API_BASE_URL};
pub use types::{
    ActiveConference, ActiveConferenceRef, ConferenceRecord, DirectoryConfig, Participant, Space,
};

#[cfg(any(test, feature = "test-utils"))]
pub use api::mock::MockMeetApi;
