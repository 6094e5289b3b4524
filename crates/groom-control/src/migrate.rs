//! One-off normalization of legacy space references.
//!
//! Rooms created before the registry stored canonical names hold a bare
//! meeting code. [`Migrator::migrate_all`] looks each such code up through
//! the directory (`spaces/{code}` is accepted as an alias) and rewrites the
//! row with the canonical `spaces/{id}` name. Rows are processed one at a
//! time; a failing row is logged and left untouched.

use std::sync::Arc;

use groom_core::SpaceReference;
use groom_meet::{MeetApi, MeetDirectory};
use groom_store::{Room, Store};

use crate::error::Result;
use crate::types::MigrationReport;

/// Rewrites legacy meeting codes to canonical space names.
pub struct Migrator<S: Store, A: MeetApi> {
    store: Arc<S>,
    directory: MeetDirectory<A>,
}

enum RowOutcome {
    Migrated,
    Skipped,
    Failed,
}

impl<S: Store, A: MeetApi> Migrator<S, A> {
    /// Create a migrator.
    #[must_use]
    pub fn new(store: Arc<S>, directory: MeetDirectory<A>) -> Self {
        Self { store, directory }
    }

    /// Visit every room and migrate the legacy ones.
    ///
    /// # Errors
    ///
    /// Returns an error only if the room list cannot be read; per-room
    /// failures are counted in the report.
    pub async fn migrate_all(&self) -> Result<MigrationReport> {
        let rooms = self.store.list_rooms().await?;
        let mut report = MigrationReport::default();

        tracing::info!(rooms = rooms.len(), "Starting legacy space migration");

        for room in &rooms {
            report.scanned += 1;
            match self.migrate_room(room).await {
                RowOutcome::Migrated => report.migrated += 1,
                RowOutcome::Skipped => report.skipped += 1,
                RowOutcome::Failed => report.failed += 1,
            }
        }

        tracing::info!(
            scanned = report.scanned,
            migrated = report.migrated,
            skipped = report.skipped,
            failed = report.failed,
            "Legacy space migration finished"
        );

        Ok(report)
    }

    async fn migrate_room(&self, room: &Room) -> RowOutcome {
        let reference = SpaceReference::parse(&room.space_id);
        if !reference.is_legacy() {
            return RowOutcome::Skipped;
        }
        let Some(alias) = reference.provider_name() else {
            return RowOutcome::Skipped;
        };

        let space = match self.directory.get_space(&alias).await {
            Ok(space) => space,
            Err(e) => {
                tracing::warn!(slug = %room.slug, code = %room.space_id, error = %e, "Space lookup failed, skipping room");
                return RowOutcome::Failed;
            }
        };

        if let Err(e) = self.store.update_space_id(room.id, &space.name).await {
            tracing::warn!(slug = %room.slug, space = %space.name, error = %e, "Room update failed, skipping room");
            return RowOutcome::Failed;
        }

        tracing::debug!(slug = %room.slug, from = %room.space_id, to = %space.name, "Migrated room");
        RowOutcome::Migrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ControlError;
    use groom_meet::{DirectoryConfig, MockMeetApi};
    use groom_store::{MemoryStore, NewRoom};

    fn migrator(store: &Arc<MemoryStore>, api: &Arc<MockMeetApi>) -> Migrator<MemoryStore, MockMeetApi> {
        let directory = MeetDirectory::new(Arc::clone(api), DirectoryConfig::default());
        Migrator::new(Arc::clone(store), directory)
    }

    async fn space_of(store: &MemoryStore, slug: &str) -> String {
        store
            .get_room_by_slug(slug)
            .await
            .unwrap()
            .unwrap()
            .space_id
    }

    #[tokio::test]
    async fn migrates_legacy_codes() {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(MockMeetApi::new());
        api.add_space_with_code("spaces/AAA", "aaa-aaaa-aaa");
        store.insert_room(NewRoom::new("legacy", "aaa-aaaa-aaa")).await.unwrap();
        store.insert_room(NewRoom::new("modern", "spaces/BBB")).await.unwrap();
        store.insert_room(NewRoom::new("empty", "")).await.unwrap();

        let report = migrator(&store, &api).migrate_all().await.unwrap();

        assert_eq!(
            report,
            MigrationReport {
                scanned: 3,
                migrated: 1,
                skipped: 2,
                failed: 0,
            }
        );
        assert_eq!(space_of(&store, "legacy").await, "spaces/AAA");
        assert_eq!(space_of(&store, "modern").await, "spaces/BBB");
        assert_eq!(space_of(&store, "empty").await, "");
        assert_eq!(api.get_space_calls(), 1);
    }

    #[tokio::test]
    async fn failing_lookup_leaves_room_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(MockMeetApi::new());
        api.add_space_with_code("spaces/AAA", "aaa-aaaa-aaa");
        api.add_space_with_code("spaces/CCC", "ccc-cccc-ccc");
        api.fail_lookups_for("spaces/bbb-bbbb-bbb");
        for (slug, code) in [
            ("a", "aaa-aaaa-aaa"),
            ("b", "bbb-bbbb-bbb"),
            ("c", "ccc-cccc-ccc"),
        ] {
            store.insert_room(NewRoom::new(slug, code)).await.unwrap();
        }

        let report = migrator(&store, &api).migrate_all().await.unwrap();

        assert_eq!(report.scanned, 3);
        assert_eq!(report.migrated, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(space_of(&store, "a").await, "spaces/AAA");
        assert_eq!(space_of(&store, "b").await, "bbb-bbbb-bbb");
        assert_eq!(space_of(&store, "c").await, "spaces/CCC");
    }

    #[tokio::test]
    async fn failing_update_is_counted() {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(MockMeetApi::new());
        api.add_space_with_code("spaces/AAA", "aaa-aaaa-aaa");
        let room = store.insert_room(NewRoom::new("a", "aaa-aaaa-aaa")).await.unwrap();
        store.fail_updates_for(room.id);

        let report = migrator(&store, &api).migrate_all().await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(space_of(&store, "a").await, "aaa-aaaa-aaa");
    }

    #[tokio::test]
    async fn unreadable_store_is_fatal() {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(MockMeetApi::new());
        store.set_unavailable(true);

        let err = migrator(&store, &api).migrate_all().await.unwrap_err();
        assert!(matches!(err, ControlError::Store(_)));
    }
}
