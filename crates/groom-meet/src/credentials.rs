//! Access tokens for the Meet API.
//!
//! The gateway calls Meet as a Workspace service account with domain-wide
//! delegation: a JWT signed with the account's RSA key is exchanged at the
//! token endpoint for a short-lived bearer token acting as the impersonated
//! user. Tokens are cached until shortly before they expire.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{MeetError, Result};

/// Scopes requested for the service account.
pub const MEET_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/meetings.space.created",
    "https://www.googleapis.com/auth/meetings.space.readonly",
];

/// Default Google token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Longest access-token lifetime taken at face value.
const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

/// Lifetime requested for each signed assertion.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Source of bearer tokens for the Meet API.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a valid access token.
    ///
    /// # Errors
    ///
    /// Returns an error if a token cannot be obtained.
    async fn access_token(&self) -> Result<String>;
}

/// A fixed bearer token, e.g. a user's OAuth access token.
#[derive(Debug, Clone)]
pub struct StaticTokenSource {
    token: String,
}

impl StaticTokenSource {
    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// The fields of a Google service-account key file that we use.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Service account e-mail, used as the JWT issuer.
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Key ID, sent as the JWT `kid` header.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl ServiceAccountKey {
    /// Load a key from a JSON credentials file.
    ///
    /// # Errors
    ///
    /// Returns `MeetError::Credentials` if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            MeetError::Credentials(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&data)
    }

    /// Parse a key from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns `MeetError::Credentials` if the JSON is malformed.
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data)
            .map_err(|e| MeetError::Credentials(format!("invalid service account key: {e}")))
    }
}

/// Claims of the JWT bearer assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Service-account token source with domain-wide delegation.
pub struct ServiceAccountTokenSource {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    subject: String,
    client: reqwest::Client,
    cache: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Create a token source impersonating `subject`.
    ///
    /// # Errors
    ///
    /// Returns `MeetError::Credentials` if the private key is not a valid RSA PEM.
    pub fn new(key: ServiceAccountKey, subject: impl Into<String>) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| MeetError::Credentials(format!("invalid private key: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MeetError::Credentials(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            key,
            encoding_key,
            subject: subject.into(),
            client,
            cache: RwLock::new(None),
        })
    }

    /// Build and sign the JWT bearer assertion.
    fn assertion(&self) -> Result<String> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            sub: &self.subject,
            scope: MEET_SCOPES.join(" "),
            aud: &self.key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| MeetError::Credentials(format!("failed to sign assertion: {e}")))
    }

    /// Exchange a fresh assertion for an access token.
    async fn fetch_token(&self) -> Result<CachedToken> {
        let assertion = self.assertion()?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        tracing::debug!(
            client_email = %self.key.client_email,
            subject = %self.subject,
            "Exchanging service account assertion"
        );

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| MeetError::Credentials(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MeetError::Credentials(format!(
                "token endpoint returned HTTP {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MeetError::Credentials(format!("invalid token response: {e}")))?;

        let now = Instant::now();
        let refresh_at = now
            .checked_add(token_lifetime(token.expires_in))
            .unwrap_or(now);

        Ok(CachedToken {
            token: token.access_token,
            refresh_at,
        })
    }
}

/// How long a token may be served from the cache.
fn token_lifetime(expires_in: Option<u64>) -> Duration {
    Duration::from_secs(expires_in.unwrap_or(3600))
        .min(MAX_TOKEN_LIFETIME)
        .saturating_sub(EXPIRY_MARGIN)
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String> {
        {
            let cache = self.cache.read();
            if let Some(cached) = cache.as_ref() {
                if Instant::now() < cached.refresh_at {
                    return Ok(cached.token.clone());
                }
            }
        }

        let fresh = self.fetch_token().await?;
        let token = fresh.token.clone();
        *self.cache.write() = Some(fresh);

        Ok(token)
    }
}
