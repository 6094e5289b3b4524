//! Provider boundary for the Meet REST API.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ConferenceRecord, Participant, Space};

/// Filter selecting conferences that are still running.
pub const ACTIVE_CONFERENCE_FILTER: &str = "end_time IS NULL";

/// Filter selecting participants that are still connected.
pub const CONNECTED_PARTICIPANT_FILTER: &str = "latest_end_time IS NULL";

/// Operations the gateway needs from the meeting provider.
///
/// Implementations are expected to follow pagination themselves; every
/// `list_*` call returns the complete result set.
#[async_trait]
pub trait MeetApi: Send + Sync {
    /// Fetch a space by resource name.
    ///
    /// `spaces/{meeting_code}` is accepted as an alias for the canonical name.
    ///
    /// # Errors
    ///
    /// Returns `MeetError::SpaceNotFound` if the space does not exist, or
    /// `MeetError::ProviderUnavailable` on transport or server failure.
    async fn get_space(&self, name: &str) -> Result<Space>;

    /// Create a new space.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the request.
    async fn create_space(&self) -> Result<Space>;

    /// List conference records, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if any page cannot be fetched.
    async fn list_conference_records(&self, filter: Option<&str>) -> Result<Vec<ConferenceRecord>>;

    /// List participants of a conference record, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if any page cannot be fetched.
    async fn list_participants(
        &self,
        record: &str,
        filter: Option<&str>,
    ) -> Result<Vec<Participant>>;

    /// Cheap reachability check (a single one-item page of conference records).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached.
    async fn ping(&self) -> Result<()>;
}

/// Mock implementation for testing.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use crate::error::MeetError;
    use groom_core::join_uri_for_code;
    use crate::types::ActiveConference;
    use parking_lot::Mutex;
    use std::collections::{HashMap, HashSet};

    /// A mock provider that keeps spaces and conferences in memory.
    ///
    /// Every trait call is counted so tests can assert on provider traffic.
    #[derive(Default)]
    pub struct MockMeetApi {
        inner: Mutex<Inner>,
    }

    #[derive(Default)]
    struct Inner {
        spaces: HashMap<String, Space>,
        conferences: Vec<ActiveConference>,
        failing: HashSet<String>,
        unavailable: bool,
        next_id: u64,
        get_space_calls: usize,
        create_space_calls: usize,
        list_conference_calls: usize,
    }

    impl MockMeetApi {
        /// Create a new mock provider.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a space. Its meeting code, if any, works as an alias.
        pub fn add_space(&self, space: Space) {
            self.inner.lock().spaces.insert(space.name.clone(), space);
        }

        /// Register a space with the given name and meeting code.
        pub fn add_space_with_code(&self, name: &str, code: &str) -> Space {
            let space = Space {
                name: name.to_string(),
                meeting_uri: Some(join_uri_for_code(code)),
                meeting_code: Some(code.to_string()),
                active_conference: None,
            };
            self.add_space(space.clone());
            space
        }

        /// Start a conference in `space` with `participants` connected.
        pub fn start_conference(&self, space: &str, participants: usize) {
            let mut inner = self.inner.lock();
            let n = inner.conferences.len() + 1;
            let record = ConferenceRecord {
                name: format!("conferenceRecords/mock-{n}"),
                space: space.to_string(),
                start_time: None,
                end_time: None,
            };
            let participants = (1..=participants)
                .map(|p| Participant {
                    name: format!("{}/participants/{p}", record.name),
                    earliest_start_time: None,
                    latest_end_time: None,
                })
                .collect();
            inner.conferences.push(ActiveConference {
                record,
                participants,
            });
        }

        /// Make lookups of `name` fail with `ProviderUnavailable`.
        pub fn fail_lookups_for(&self, name: &str) {
            self.inner.lock().failing.insert(name.to_string());
        }

        /// Make every call fail with `ProviderUnavailable`.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.inner.lock().unavailable = unavailable;
        }

        /// Number of `get_space` calls made so far.
        #[must_use]
        pub fn get_space_calls(&self) -> usize {
            self.inner.lock().get_space_calls
        }

        /// Number of `create_space` calls made so far.
        #[must_use]
        pub fn create_space_calls(&self) -> usize {
            self.inner.lock().create_space_calls
        }

        /// Number of `list_conference_records` calls made so far.
        #[must_use]
        pub fn list_conference_calls(&self) -> usize {
            self.inner.lock().list_conference_calls
        }

        /// Number of spaces known to the mock.
        #[must_use]
        pub fn space_count(&self) -> usize {
            self.inner.lock().spaces.len()
        }
    }

    impl Inner {
        fn check_available(&self) -> Result<()> {
            if self.unavailable {
                return Err(MeetError::ProviderUnavailable(
                    "mock provider unavailable".to_string(),
                ));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MeetApi for MockMeetApi {
        async fn get_space(&self, name: &str) -> Result<Space> {
            let mut inner = self.inner.lock();
            inner.get_space_calls += 1;
            inner.check_available()?;

            if inner.failing.contains(name) {
                return Err(MeetError::ProviderUnavailable(format!(
                    "mock lookup failure for {name}"
                )));
            }

            if let Some(space) = inner.spaces.get(name) {
                return Ok(space.clone());
            }

            let alias = name.strip_prefix("spaces/").unwrap_or(name);
            inner
                .spaces
                .values()
                .find(|s| s.meeting_code.as_deref() == Some(alias))
                .cloned()
                .ok_or_else(|| MeetError::SpaceNotFound(name.to_string()))
        }

        async fn create_space(&self) -> Result<Space> {
            let mut inner = self.inner.lock();
            inner.create_space_calls += 1;
            inner.check_available()?;

            inner.next_id += 1;
            let id = inner.next_id;
            let code = format!("mck-{id:04}-xyz");
            let space = Space {
                name: format!("spaces/mock-{id}"),
                meeting_uri: Some(join_uri_for_code(&code)),
                meeting_code: Some(code),
                active_conference: None,
            };
            inner.spaces.insert(space.name.clone(), space.clone());
            Ok(space)
        }

        async fn list_conference_records(
            &self,
            filter: Option<&str>,
        ) -> Result<Vec<ConferenceRecord>> {
            let mut inner = self.inner.lock();
            inner.list_conference_calls += 1;
            inner.check_available()?;

            let active_only = filter == Some(ACTIVE_CONFERENCE_FILTER);
            Ok(inner
                .conferences
                .iter()
                .map(|c| c.record.clone())
                .filter(|r| !active_only || r.end_time.is_none())
                .collect())
        }

        async fn list_participants(
            &self,
            record: &str,
            _filter: Option<&str>,
        ) -> Result<Vec<Participant>> {
            let inner = self.inner.lock();
            inner.check_available()?;

            Ok(inner
                .conferences
                .iter()
                .find(|c| c.record.name == record)
                .map(|c| c.participants.clone())
                .unwrap_or_default())
        }

        async fn ping(&self) -> Result<()> {
            self.inner.lock().check_available()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockMeetApi;
    use super::*;
    use crate::error::MeetError;

    #[tokio::test]
    async fn mock_resolves_meeting_code_alias() {
        let api = MockMeetApi::new();
        api.add_space_with_code("spaces/abc123", "abc-mnop-xyz");

        let space = api.get_space("spaces/abc-mnop-xyz").await.unwrap();
        assert_eq!(space.name, "spaces/abc123");

        let err = api.get_space("spaces/unknown").await.unwrap_err();
        assert!(matches!(err, MeetError::SpaceNotFound(_)));
        assert_eq!(api.get_space_calls(), 2);
    }

    #[tokio::test]
    async fn mock_created_spaces_are_retrievable() {
        let api = MockMeetApi::new();

        let created = api.create_space().await.unwrap();
        assert!(created.name.starts_with("spaces/"));

        let fetched = api.get_space(&created.name).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn mock_lists_active_conferences() {
        let api = MockMeetApi::new();
        api.start_conference("spaces/1", 2);

        let records = api
            .list_conference_records(Some(ACTIVE_CONFERENCE_FILTER))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);

        let participants = api
            .list_participants(&records[0].name, Some(CONNECTED_PARTICIPANT_FILTER))
            .await
            .unwrap();
        assert_eq!(participants.len(), 2);
    }

    #[tokio::test]
    async fn mock_unavailable() {
        let api = MockMeetApi::new();
        api.set_unavailable(true);

        assert!(api.ping().await.is_err());
        assert!(api.create_space().await.is_err());
    }
}
