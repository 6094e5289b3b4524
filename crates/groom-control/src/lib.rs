//! Room resolution and registry management for groom.
//!
//! This crate provides the business logic between the HTTP gateway and its
//! two backends: the room store and the Meet directory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Gateway (HTTP)                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        RoomService                           │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐   │
//! │  │   Slug      │ │  Occupancy  │ │    Room             │   │
//! │  │   Resolve   │ │  Listing    │ │    CRUD             │   │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                    ┌─────────┴─────────┐
//!                    ▼                   ▼
//!             ┌──────────┐        ┌──────────────┐
//!             │  Store   │        │ MeetDirectory│
//!             │ (Postgres)│       │ (cached)     │
//!             └──────────┘        └──────────────┘
//! ```
//!
//! The [`Migrator`] runs outside the request path (see the `groom-migrate`
//! binary) and rewrites legacy meeting codes to canonical space names.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use groom_control::{RoomControl, RoomService};
//! use groom_meet::{DirectoryConfig, GoogleMeetApi, MeetDirectory, StaticTokenSource};
//! use groom_store::PgStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(PgStore::connect("postgres://groom@localhost/groom").await?);
//! let api = Arc::new(GoogleMeetApi::new(Arc::new(StaticTokenSource::new("ya29...")))?);
//! let rooms = RoomService::new(store, MeetDirectory::new(api, DirectoryConfig::default()));
//!
//! let room = rooms.create_room("standup").await?;
//! println!("{} -> {}", room.slug, rooms.resolve_slug("standup").await?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod migrate;
pub mod service;
pub mod types;

pub use error::{ControlError, Result};
pub use migrate::Migrator;
pub use service::{RoomControl, RoomService};
pub use types::{CreateRoomRequest, HealthReport, MigrationReport, RoomOccupancy, UpdateRoomRequest};

// Re-export commonly used types from dependencies for convenience
pub use groom_store::Room;
