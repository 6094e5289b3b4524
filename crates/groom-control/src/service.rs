//! Room service implementation.
//!
//! This module provides the `RoomControl` trait and the `RoomService`
//! implementation that resolves slugs to meeting URIs and manages the room
//! registry.

use std::sync::Arc;

use async_trait::async_trait;
use groom_core::{join_uri_for_code, Slug, SpaceReference};
use groom_meet::{MeetApi, MeetDirectory, MeetError, Space};
use groom_store::{NewRoom, Room, Store, StoreError};

use crate::error::{ControlError, Result};
use crate::types::{HealthReport, RoomOccupancy, UpdateRoomRequest};

/// Trait defining the room operations used by the gateway.
#[async_trait]
pub trait RoomControl: Send + Sync {
    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a slug to the URI the browser should be redirected to.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::RoomNotFound` for unknown slugs, or a provider
    /// error if the space cannot be looked up.
    async fn resolve_slug(&self, slug: &str) -> Result<String>;

    /// List every room with its current occupancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the rooms or the active conferences cannot be read.
    async fn list_rooms_with_occupancy(&self) -> Result<Vec<RoomOccupancy>>;

    // =========================================================================
    // CRUD
    // =========================================================================

    /// List all rooms ordered by slug.
    async fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Get a room by ID.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::RoomNotFound` if the room doesn't exist.
    async fn get_room(&self, id: i64) -> Result<Room>;

    /// Create a room and allocate its meeting space.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::InvalidSlug` or `ControlError::SlugTaken` for
    /// unusable slugs, or a provider error if the space cannot be created.
    async fn create_room(&self, slug: &str) -> Result<Room>;

    /// Point a room at a different space.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::RoomNotFound` if the room doesn't exist, or
    /// `ControlError::InvalidInput` if the request tries to change the slug.
    async fn update_room(&self, id: i64, request: UpdateRoomRequest) -> Result<Room>;

    /// Delete a room.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::RoomNotFound` if the room doesn't exist.
    async fn delete_room(&self, id: i64) -> Result<()>;

    // =========================================================================
    // Operational
    // =========================================================================

    /// Check the store and the meeting provider.
    async fn health(&self) -> HealthReport;
}

/// The main room service implementation.
pub struct RoomService<S: Store, A: MeetApi> {
    store: Arc<S>,
    directory: MeetDirectory<A>,
}

impl<S: Store, A: MeetApi> RoomService<S, A> {
    /// Create a new room service.
    #[must_use]
    pub fn new(store: Arc<S>, directory: MeetDirectory<A>) -> Self {
        Self { store, directory }
    }

    /// Get a reference to the store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the meeting directory.
    #[must_use]
    pub fn directory(&self) -> &MeetDirectory<A> {
        &self.directory
    }

    /// Allocate a space for a room created before eager allocation existed.
    async fn allocate_space(&self, room: &Room) -> Result<Space> {
        let space = self.directory.create_space().await?;
        match self.store.update_space_id(room.id, &space.name).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => return Err(ControlError::RoomNotFound(room.slug.clone())),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(slug = %room.slug, space = %space.name, "Allocated space for room");
        Ok(space)
    }
}

/// The joinable URI of a space.
fn join_uri(space: &Space) -> Result<String> {
    if let Some(uri) = space.meeting_uri.as_deref().filter(|u| !u.is_empty()) {
        return Ok(uri.to_string());
    }
    if let Some(code) = space.meeting_code.as_deref().filter(|c| !c.is_empty()) {
        return Ok(join_uri_for_code(code));
    }
    Err(MeetError::InvalidResponse(format!("space {} has no meeting URI or code", space.name)).into())
}

fn not_found_by_id(id: i64) -> ControlError {
    ControlError::RoomNotFound(id.to_string())
}

#[async_trait]
impl<S, A> RoomControl for RoomService<S, A>
where
    S: Store + 'static,
    A: MeetApi + 'static,
{
    async fn resolve_slug(&self, slug: &str) -> Result<String> {
        // A string that can't be a slug can't name a room.
        let slug = Slug::parse(slug).map_err(|_| ControlError::RoomNotFound(slug.to_string()))?;

        let room = self
            .store
            .get_room_by_slug(slug.as_str())
            .await?
            .ok_or_else(|| ControlError::RoomNotFound(slug.to_string()))?;

        match SpaceReference::parse(&room.space_id) {
            SpaceReference::Canonical(name) => {
                let space = self.directory.get_space(&name).await?;
                join_uri(&space)
            }
            SpaceReference::Legacy(code) => Ok(join_uri_for_code(&code)),
            SpaceReference::Empty => {
                let space = self.allocate_space(&room).await?;
                join_uri(&space)
            }
        }
    }

    async fn list_rooms_with_occupancy(&self) -> Result<Vec<RoomOccupancy>> {
        let rooms = self.store.list_rooms().await?;
        let conferences = self.directory.list_active_conferences().await?;

        Ok(rooms
            .into_iter()
            .map(|room| {
                let active = conferences
                    .iter()
                    .find(|c| !room.space_id.is_empty() && c.space() == room.space_id);
                RoomOccupancy {
                    is_occupied: active.is_some(),
                    participant_count: active.map_or(0, |c| c.participant_count()),
                    room,
                }
            })
            .collect())
    }

    async fn list_rooms(&self) -> Result<Vec<Room>> {
        Ok(self.store.list_rooms().await?)
    }

    async fn get_room(&self, id: i64) -> Result<Room> {
        self.store
            .get_room(id)
            .await?
            .ok_or_else(|| not_found_by_id(id))
    }

    async fn create_room(&self, slug: &str) -> Result<Room> {
        let slug = Slug::parse(slug)?;

        if self.store.get_room_by_slug(slug.as_str()).await?.is_some() {
            return Err(ControlError::SlugTaken(slug.into_inner()));
        }

        let space = self.directory.create_space().await?;

        let room = self
            .store
            .insert_room(NewRoom::new(slug.as_str(), space.name))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => ControlError::SlugTaken(slug.to_string()),
                other => other.into(),
            })?;

        tracing::info!(id = room.id, slug = %room.slug, space = %room.space_id, "Created room");
        Ok(room)
    }

    async fn update_room(&self, id: i64, request: UpdateRoomRequest) -> Result<Room> {
        let space_id = request.space_id.trim();
        if space_id.is_empty() {
            return Err(ControlError::InvalidInput(
                "space_id must not be empty".to_string(),
            ));
        }

        let room = self.get_room(id).await?;
        if let Some(slug) = request.slug.as_deref() {
            if slug != room.slug {
                return Err(ControlError::InvalidInput(
                    "slug cannot be changed".to_string(),
                ));
            }
        }

        let updated = self
            .store
            .update_space_id(id, space_id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => not_found_by_id(id),
                other => other.into(),
            })?;

        tracing::info!(id, slug = %updated.slug, space = %updated.space_id, "Updated room");
        Ok(updated)
    }

    async fn delete_room(&self, id: i64) -> Result<()> {
        self.store.delete_room(id).await.map_err(|e| match e {
            StoreError::NotFound => not_found_by_id(id),
            other => other.into(),
        })?;

        tracing::info!(id, "Deleted room");
        Ok(())
    }

    async fn health(&self) -> HealthReport {
        let database = match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Store health check failed");
                false
            }
        };
        let provider = self.directory.health_check().await;

        HealthReport { database, provider }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groom_meet::{DirectoryConfig, MockMeetApi};
    use groom_store::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        api: Arc<MockMeetApi>,
        service: RoomService<MemoryStore, MockMeetApi>,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(MockMeetApi::new());
        let directory = MeetDirectory::new(Arc::clone(&api), DirectoryConfig::default());
        let service = RoomService::new(Arc::clone(&store), directory);
        Fixture {
            store,
            api,
            service,
        }
    }

    async fn seed(f: &Fixture, slug: &str, space_id: &str) -> Room {
        f.store
            .insert_room(NewRoom::new(slug, space_id))
            .await
            .unwrap()
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let f = fixture();

        let err = f.service.resolve_slug("nope").await.unwrap_err();
        assert!(matches!(err, ControlError::RoomNotFound(_)));
        assert_eq!(f.api.get_space_calls(), 0);
    }

    #[tokio::test]
    async fn malformed_slug_is_not_found() {
        let f = fixture();

        let err = f.service.resolve_slug("Not A Slug").await.unwrap_err();
        assert!(matches!(err, ControlError::RoomNotFound(_)));
    }

    #[tokio::test]
    async fn canonical_room_redirects_to_space_uri() {
        let f = fixture();
        f.api.add_space_with_code("spaces/abc", "abc-mnop-xyz");
        seed(&f, "standup", "spaces/abc").await;

        let uri = f.service.resolve_slug("standup").await.unwrap();

        assert_eq!(uri, "https://meet.google.com/abc-mnop-xyz");
        assert_eq!(f.api.get_space_calls(), 1);
    }

    #[tokio::test]
    async fn space_without_uri_falls_back_to_code() {
        let f = fixture();
        f.api.add_space(Space {
            name: "spaces/abc".to_string(),
            meeting_uri: None,
            meeting_code: Some("abc-mnop-xyz".to_string()),
            active_conference: None,
        });
        seed(&f, "standup", "spaces/abc").await;

        let uri = f.service.resolve_slug("standup").await.unwrap();
        assert_eq!(uri, "https://meet.google.com/abc-mnop-xyz");
    }

    #[tokio::test]
    async fn space_without_uri_or_code_is_provider_error() {
        let f = fixture();
        f.api.add_space(Space {
            name: "spaces/abc".to_string(),
            meeting_uri: None,
            meeting_code: None,
            active_conference: None,
        });
        seed(&f, "standup", "spaces/abc").await;

        let err = f.service.resolve_slug("standup").await.unwrap_err();
        assert!(matches!(err, ControlError::Provider(_)));
    }

    #[tokio::test]
    async fn legacy_room_redirects_without_provider_call() {
        let f = fixture();
        seed(&f, "retro", "abc-mnop-xyz").await;

        let uri = f.service.resolve_slug("retro").await.unwrap();

        assert_eq!(uri, "https://meet.google.com/abc-mnop-xyz");
        assert_eq!(f.api.get_space_calls(), 0);
    }

    #[tokio::test]
    async fn empty_room_gets_a_space_on_first_use() {
        let f = fixture();
        let room = seed(&f, "lazy", "").await;

        let uri = f.service.resolve_slug("lazy").await.unwrap();
        assert!(uri.starts_with("https://meet.google.com/"));
        assert_eq!(f.api.create_space_calls(), 1);

        let stored = f.store.get_room(room.id).await.unwrap().unwrap();
        assert!(stored.space_id.starts_with("spaces/"));
        assert!(stored.updated_at >= room.updated_at);

        // The second visit uses the stored space.
        f.service.resolve_slug("lazy").await.unwrap();
        assert_eq!(f.api.create_space_calls(), 1);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let f = fixture();
        f.api.add_space_with_code("spaces/abc", "abc-mnop-xyz");
        f.api.set_unavailable(true);
        seed(&f, "standup", "spaces/abc").await;

        let err = f.service.resolve_slug("standup").await.unwrap_err();
        assert_eq!(err.http_status_code(), 500);
    }

    // =========================================================================
    // Occupancy
    // =========================================================================

    #[tokio::test]
    async fn occupancy_annotates_rooms() {
        let f = fixture();
        seed(&f, "b", "spaces/2").await;
        seed(&f, "a", "spaces/1").await;
        f.api.start_conference("spaces/1", 2);

        let rooms = f.service.list_rooms_with_occupancy().await.unwrap();

        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].room.slug, "a");
        assert!(rooms[0].is_occupied);
        assert_eq!(rooms[0].participant_count, 2);
        assert_eq!(rooms[1].room.slug, "b");
        assert!(!rooms[1].is_occupied);
        assert_eq!(rooms[1].participant_count, 0);

        assert_eq!(f.api.list_conference_calls(), 1);
    }

    // =========================================================================
    // CRUD
    // =========================================================================

    #[tokio::test]
    async fn create_room_allocates_space() {
        let f = fixture();

        let room = f.service.create_room("standup").await.unwrap();

        assert_eq!(room.slug, "standup");
        assert!(room.space_id.starts_with("spaces/"));
        assert_eq!(f.api.create_space_calls(), 1);
    }

    #[tokio::test]
    async fn create_room_rejects_duplicates_before_allocating() {
        let f = fixture();
        f.service.create_room("standup").await.unwrap();

        let err = f.service.create_room("standup").await.unwrap_err();

        assert!(matches!(err, ControlError::SlugTaken(_)));
        assert_eq!(f.api.create_space_calls(), 1);
    }

    #[tokio::test]
    async fn create_room_validates_slug() {
        let f = fixture();

        let err = f.service.create_room("api").await.unwrap_err();
        assert!(matches!(err, ControlError::InvalidSlug(_)));

        let err = f.service.create_room("").await.unwrap_err();
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(f.api.create_space_calls(), 0);
    }

    #[tokio::test]
    async fn update_room_changes_space_only() {
        let f = fixture();
        let room = seed(&f, "standup", "abc-mnop-xyz").await;

        let updated = f
            .service
            .update_room(
                room.id,
                UpdateRoomRequest {
                    space_id: "spaces/new".to_string(),
                    slug: Some("standup".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "standup");
        assert_eq!(updated.space_id, "spaces/new");
    }

    #[tokio::test]
    async fn update_room_rejects_slug_change() {
        let f = fixture();
        let room = seed(&f, "standup", "spaces/a").await;

        let err = f
            .service
            .update_room(
                room.id,
                UpdateRoomRequest {
                    space_id: "spaces/b".to_string(),
                    slug: Some("renamed".to_string()),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ControlError::InvalidInput(_)));
        let stored = f.service.get_room(room.id).await.unwrap();
        assert_eq!(stored.space_id, "spaces/a");
    }

    #[tokio::test]
    async fn update_missing_room_is_not_found() {
        let f = fixture();

        let err = f
            .service
            .update_room(
                42,
                UpdateRoomRequest {
                    space_id: "spaces/b".to_string(),
                    slug: None,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ControlError::RoomNotFound(_)));
    }

    #[tokio::test]
    async fn delete_room() {
        let f = fixture();
        let room = seed(&f, "standup", "spaces/a").await;

        f.service.delete_room(room.id).await.unwrap();

        let err = f.service.get_room(room.id).await.unwrap_err();
        assert!(matches!(err, ControlError::RoomNotFound(_)));

        let err = f.service.delete_room(room.id).await.unwrap_err();
        assert!(matches!(err, ControlError::RoomNotFound(_)));
    }

    // =========================================================================
    // Operational
    // =========================================================================

    #[tokio::test]
    async fn health_reports_each_dependency() {
        let f = fixture();
        assert!(f.service.health().await.is_healthy());

        f.store.set_unavailable(true);
        let report = f.service.health().await;
        assert!(!report.database);
        assert!(report.provider);

        f.store.set_unavailable(false);
        f.api.set_unavailable(true);
        let report = f.service.health().await;
        assert!(report.database);
        assert!(!report.provider);
    }
}
