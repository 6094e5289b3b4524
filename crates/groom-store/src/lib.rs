//! Room registry storage for groom.
//!
//! This crate persists the slug to meeting-space mapping in a single relational
//! table:
//!
//! - `rooms`: `id`, unique `slug`, `space_id`, `created_at`, `updated_at`
//!
//! The [`Store`] trait is the only thing the rest of the workspace depends on.
//! [`PgStore`] backs it with `PostgreSQL`; `MemoryStore` (feature `test-utils`)
//! backs it with a map for tests.
//!
//! # Example
//!
//! ```no_run
//! use groom_store::{NewRoom, PgStore, Store};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PgStore::connect("postgres://groom@localhost/groom").await?;
//! store.ensure_schema().await?;
//!
//! let room = store.insert_room(NewRoom::new("standup", "spaces/abc")).await?;
//! let found = store.get_room_by_slug("standup").await?;
//! assert_eq!(found.map(|r| r.id), Some(room.id));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod types;

pub use error::{Result, StoreError};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use types::{NewRoom, Room};

use async_trait::async_trait;

/// The storage trait defining all room registry operations.
///
/// This trait abstracts the storage layer, allowing for different implementations
/// (e.g., `PostgreSQL`, in-memory for testing).
#[async_trait]
pub trait Store: Send + Sync {
    /// Get a room by its surrogate key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_room(&self, id: i64) -> Result<Option<Room>>;

    /// Get a room by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_room_by_slug(&self, slug: &str) -> Result<Option<Room>>;

    /// List all rooms ordered by slug ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Insert a room and return the stored record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the slug is already taken.
    async fn insert_room(&self, room: NewRoom) -> Result<Room>;

    /// Replace a room's space reference and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the room doesn't exist.
    async fn update_space_id(&self, id: i64, space_id: &str) -> Result<Room>;

    /// Delete a room by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the room doesn't exist.
    async fn delete_room(&self, id: i64) -> Result<()>;

    /// Check that the backing database is reachable.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    async fn ping(&self) -> Result<()>;
}
