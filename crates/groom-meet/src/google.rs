//! Google Meet REST v2 implementation of [`MeetApi`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::api::MeetApi;
use crate::credentials::TokenSource;
use crate::error::{MeetError, Result};
use crate::types::{ConferenceRecord, Participant, Space};

/// Production endpoint of the Meet REST API.
pub const MEET_API_BASE_URL: &str = "https://meet.googleapis.com/v2";

/// Page of `conferenceRecords.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConferenceRecordPage {
    #[serde(default)]
    conference_records: Vec<ConferenceRecord>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Page of `conferenceRecords.participants.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipantPage {
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// HTTP client for the Meet REST API.
#[derive(Clone)]
pub struct GoogleMeetApi {
    client: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl GoogleMeetApi {
    /// Create a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(tokens: Arc<dyn TokenSource>) -> Result<Self> {
        Self::with_base_url(tokens, MEET_API_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(tokens: Arc<dyn TokenSource>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| {
                MeetError::ProviderUnavailable(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send an authorized request and decode the JSON body.
    ///
    /// A 404 is reported as `SpaceNotFound(resource)`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T> {
        let token = self.tokens.access_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| MeetError::ProviderUnavailable(format!("request failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(MeetError::SpaceNotFound(resource.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, resource, "Meet API returned error");
            return Err(MeetError::ProviderUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| MeetError::InvalidResponse(e.to_string()))
    }

    async fn conference_record_page(
        &self,
        filter: Option<&str>,
        page_size: Option<u32>,
        page_token: Option<&str>,
    ) -> Result<ConferenceRecordPage> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(filter) = filter {
            query.push(("filter", filter.to_string()));
        }
        if let Some(size) = page_size {
            query.push(("pageSize", size.to_string()));
        }
        if let Some(token) = page_token {
            query.push(("pageToken", token.to_string()));
        }

        let request = self
            .client
            .get(format!("{}/conferenceRecords", self.base_url))
            .query(&query);
        self.send(request, "conferenceRecords").await
    }
}

#[async_trait]
impl MeetApi for GoogleMeetApi {
    async fn get_space(&self, name: &str) -> Result<Space> {
        let request = self.client.get(format!("{}/{name}", self.base_url));
        self.send(request, name).await
    }

    async fn create_space(&self) -> Result<Space> {
        let request = self
            .client
            .post(format!("{}/spaces", self.base_url))
            .json(&serde_json::json!({}));
        let space: Space = self.send(request, "spaces").await?;

        tracing::info!(space = %space.name, "Created Meet space");
        Ok(space)
    }

    async fn list_conference_records(&self, filter: Option<&str>) -> Result<Vec<ConferenceRecord>> {
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .conference_record_page(filter, None, page_token.as_deref())
                .await?;
            records.extend(page.conference_records);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn list_participants(
        &self,
        record: &str,
        filter: Option<&str>,
    ) -> Result<Vec<Participant>> {
        let mut participants = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(filter) = filter {
                query.push(("filter", filter.to_string()));
            }
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token.to_string()));
            }

            let request = self
                .client
                .get(format!("{}/{record}/participants", self.base_url))
                .query(&query);
            let page: ParticipantPage = self.send(request, record).await?;
            participants.extend(page.participants);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(participants)
    }

    async fn ping(&self) -> Result<()> {
        self.conference_record_page(None, Some(1), None).await?;
        Ok(())
    }
}
