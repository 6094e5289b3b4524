//! In-memory storage for tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::types::{NewRoom, Room};
use crate::Store;

/// A `Store` that keeps rooms in a map.
///
/// Mirrors the constraints of the `rooms` table: slugs are unique and ids
/// are assigned monotonically.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    rooms: BTreeMap<i64, Room>,
    next_id: i64,
    unavailable: bool,
    failing_updates: Vec<i64>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Database`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }

    /// Make `update_space_id` fail for the given room.
    pub fn fail_updates_for(&self, id: i64) {
        self.inner.lock().failing_updates.push(id);
    }

    /// Number of stored rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().rooms.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().rooms.is_empty()
    }

    fn check_available(inner: &Inner) -> Result<()> {
        if inner.unavailable {
            return Err(StoreError::Database("store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_room(&self, id: i64) -> Result<Option<Room>> {
        let inner = self.inner.lock();
        Self::check_available(&inner)?;
        Ok(inner.rooms.get(&id).cloned())
    }

    async fn get_room_by_slug(&self, slug: &str) -> Result<Option<Room>> {
        let inner = self.inner.lock();
        Self::check_available(&inner)?;
        Ok(inner.rooms.values().find(|r| r.slug == slug).cloned())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        let inner = self.inner.lock();
        Self::check_available(&inner)?;
        let mut rooms: Vec<Room> = inner.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(rooms)
    }

    async fn insert_room(&self, room: NewRoom) -> Result<Room> {
        let mut inner = self.inner.lock();
        Self::check_available(&inner)?;

        if inner.rooms.values().any(|r| r.slug == room.slug) {
            return Err(StoreError::Conflict(format!(
                "duplicate slug {}",
                room.slug
            )));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let room = Room {
            id: inner.next_id,
            slug: room.slug,
            space_id: room.space_id,
            created_at: now,
            updated_at: now,
        };
        inner.rooms.insert(room.id, room.clone());

        Ok(room)
    }

    async fn update_space_id(&self, id: i64, space_id: &str) -> Result<Room> {
        let mut inner = self.inner.lock();
        Self::check_available(&inner)?;

        if inner.failing_updates.contains(&id) {
            return Err(StoreError::Database(format!("update of room {id} failed")));
        }

        let room = inner.rooms.get_mut(&id).ok_or(StoreError::NotFound)?;
        room.space_id = space_id.to_string();
        room.updated_at = Utc::now();

        Ok(room.clone())
    }

    async fn delete_room(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_available(&inner)?;
        inner
            .rooms
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<()> {
        Self::check_available(&self.inner.lock())
    }
}
