//! Caching facade over the meeting provider.

use std::sync::Arc;

use crate::api::{MeetApi, ACTIVE_CONFERENCE_FILTER, CONNECTED_PARTICIPANT_FILTER};
use crate::cache::{MemoryCache, TtlCache};
use crate::error::Result;
use crate::types::{ActiveConference, DirectoryConfig, Space};

/// Cache key of the active-conference snapshot.
const ACTIVE_CONFERENCES_KEY: &str = "active-conferences";

/// Read-through cache in front of a [`MeetApi`].
///
/// Space lookups are cached per resource name for `space_ttl`; the listing of
/// running conferences is cached as a single snapshot for `conference_ttl`.
/// Creation is never cached.
pub struct MeetDirectory<A: MeetApi> {
    api: Arc<A>,
    spaces: Arc<dyn TtlCache<Space>>,
    conferences: Arc<dyn TtlCache<Vec<ActiveConference>>>,
    config: DirectoryConfig,
}

impl<A: MeetApi> Clone for MeetDirectory<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            spaces: Arc::clone(&self.spaces),
            conferences: Arc::clone(&self.conferences),
            config: self.config.clone(),
        }
    }
}

impl<A: MeetApi> MeetDirectory<A> {
    /// Create a directory backed by in-memory caches.
    #[must_use]
    pub fn new(api: Arc<A>, config: DirectoryConfig) -> Self {
        Self::with_caches(
            api,
            Arc::new(MemoryCache::new()),
            Arc::new(MemoryCache::new()),
            config,
        )
    }

    /// Create a directory with caller-supplied caches.
    #[must_use]
    pub fn with_caches(
        api: Arc<A>,
        spaces: Arc<dyn TtlCache<Space>>,
        conferences: Arc<dyn TtlCache<Vec<ActiveConference>>>,
        config: DirectoryConfig,
    ) -> Self {
        Self {
            api,
            spaces,
            conferences,
            config,
        }
    }

    /// The underlying provider.
    #[must_use]
    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Look a space up by resource name, serving from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns the provider error on a cache miss that cannot be filled.
    pub async fn get_space(&self, name: &str) -> Result<Space> {
        if let Some(space) = self.spaces.get(name).await {
            tracing::debug!(space = %name, "Space cache hit");
            return Ok(space);
        }

        tracing::debug!(space = %name, "Space cache miss");
        let space = self.api.get_space(name).await?;
        self.spaces
            .put(name.to_string(), space.clone(), self.config.space_ttl())
            .await;

        Ok(space)
    }

    /// Create a new space. Never cached.
    ///
    /// # Errors
    ///
    /// Returns the provider error if creation fails.
    pub async fn create_space(&self) -> Result<Space> {
        self.api.create_space().await
    }

    /// List running conferences with their connected participants.
    ///
    /// # Errors
    ///
    /// Returns the provider error on a cache miss that cannot be filled.
    pub async fn list_active_conferences(&self) -> Result<Vec<ActiveConference>> {
        if let Some(conferences) = self.conferences.get(ACTIVE_CONFERENCES_KEY).await {
            tracing::debug!(count = conferences.len(), "Conference cache hit");
            return Ok(conferences);
        }

        tracing::debug!("Conference cache miss");
        let records = self
            .api
            .list_conference_records(Some(ACTIVE_CONFERENCE_FILTER))
            .await?;

        let mut conferences = Vec::with_capacity(records.len());
        for record in records {
            let participants = self
                .api
                .list_participants(&record.name, Some(CONNECTED_PARTICIPANT_FILTER))
                .await?;
            conferences.push(ActiveConference {
                record,
                participants,
            });
        }

        self.conferences
            .put(
                ACTIVE_CONFERENCES_KEY.to_string(),
                conferences.clone(),
                self.config.conference_ttl(),
            )
            .await;

        Ok(conferences)
    }

    /// Check provider reachability. Failures are logged, never returned.
    pub async fn health_check(&self) -> bool {
        match self.api.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Meet provider health check failed");
                false
            }
        }
    }
}
