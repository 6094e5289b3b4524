//! Gateway configuration types.
//!
//! This module defines the configuration for the HTTP gateway and loads it
//! from environment variables.

use std::fmt;
use std::time::Duration;

use groom_auth::AuthConfig;
use groom_meet::DirectoryConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Configuration for the gateway service.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen host.
    #[serde(default = "GatewayConfig::default_host")]
    pub host: String,

    /// Listen port.
    #[serde(default = "GatewayConfig::default_port")]
    pub port: u16,

    /// `PostgreSQL` connection string.
    pub database_url: String,

    /// Workspace domain users must belong to.
    pub workspace_domain: String,

    /// OAuth client ID.
    pub google_client_id: String,

    /// OAuth client secret.
    pub google_client_secret: String,

    /// OAuth callback URL.
    pub google_redirect_url: String,

    /// Path to the service-account key file.
    #[serde(default = "GatewayConfig::default_credentials_file")]
    pub service_account_credentials_file: String,

    /// User the service account acts as.
    pub service_account_impersonated_user: String,

    /// Shared secret for the `/api` routes.
    pub api_key: String,

    /// Space lookup cache TTL in seconds.
    #[serde(default = "GatewayConfig::default_space_ttl")]
    pub space_cache_ttl_seconds: u64,

    /// Active-conference cache TTL in seconds.
    #[serde(default = "GatewayConfig::default_conference_ttl")]
    pub conference_cache_ttl_seconds: u64,

    /// Mark the session cookie `Secure`.
    #[serde(default)]
    pub session_secure_cookie: bool,

    /// Allowed CORS origins.
    #[serde(default = "GatewayConfig::default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    const fn default_port() -> u16 {
        3000
    }

    fn default_credentials_file() -> String {
        "./service_account.json".to_string()
    }

    const fn default_space_ttl() -> u64 {
        3600 // 1 hour
    }

    const fn default_conference_ttl() -> u64 {
        5
    }

    fn default_cors_origins() -> Vec<String> {
        vec!["*".to_string()]
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` for unset required variables and
    /// `ConfigError::Invalid` for unparsable values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`GatewayConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let required = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            host: get("HOST").unwrap_or_else(Self::default_host),
            port: parse_or(get("PORT"), "PORT", Self::default_port())?,
            database_url: required("DATABASE_URL")?,
            workspace_domain: required("GOOGLE_WORKSPACE_DOMAIN")?,
            google_client_id: required("GOOGLE_CLIENT_ID")?,
            google_client_secret: required("GOOGLE_CLIENT_SECRET")?,
            google_redirect_url: required("GOOGLE_REDIRECT_URL")?,
            service_account_credentials_file: get("GOOGLE_SERVICE_ACCOUNT_CREDENTIALS_FILE")
                .unwrap_or_else(Self::default_credentials_file),
            service_account_impersonated_user: required(
                "GOOGLE_SERVICE_ACCOUNT_IMPERSONATED_USER",
            )?,
            api_key: required("GROOM_API_KEY")?,
            space_cache_ttl_seconds: parse_or(
                get("SPACE_CACHE_TTL_SECONDS"),
                "SPACE_CACHE_TTL_SECONDS",
                Self::default_space_ttl(),
            )?,
            conference_cache_ttl_seconds: parse_or(
                get("CONFERENCE_CACHE_TTL_SECONDS"),
                "CONFERENCE_CACHE_TTL_SECONDS",
                Self::default_conference_ttl(),
            )?,
            session_secure_cookie: parse_or(
                get("SESSION_SECURE_COOKIE"),
                "SESSION_SECURE_COOKIE",
                false,
            )?,
            cors_origins: get("CORS_ORIGINS").map_or_else(Self::default_cors_origins, |v| {
                v.split(',').map(|o| o.trim().to_string()).collect()
            }),
            max_body_bytes: parse_or(
                get("MAX_BODY_BYTES"),
                "MAX_BODY_BYTES",
                Self::default_max_body(),
            )?,
            request_timeout_seconds: parse_or(
                get("REQUEST_TIMEOUT_SECONDS"),
                "REQUEST_TIMEOUT_SECONDS",
                Self::default_request_timeout(),
            )?,
        })
    }

    /// Address to bind, as `host:port`.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// OAuth client settings.
    #[must_use]
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            client_id: self.google_client_id.clone(),
            client_secret: self.google_client_secret.clone(),
            redirect_url: self.google_redirect_url.clone(),
            domain: self.workspace_domain.clone(),
            ..AuthConfig::default()
        }
    }

    /// Directory cache settings.
    #[must_use]
    pub fn directory_config(&self) -> DirectoryConfig {
        DirectoryConfig {
            space_ttl_seconds: self.space_cache_ttl_seconds,
            conference_ttl_seconds: self.conference_cache_ttl_seconds,
        }
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { name, value: v }),
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("workspace_domain", &self.workspace_domain)
            .field("google_client_id", &self.google_client_id)
            .field("google_redirect_url", &self.google_redirect_url)
            .field(
                "service_account_credentials_file",
                &self.service_account_credentials_file,
            )
            .field(
                "service_account_impersonated_user",
                &self.service_account_impersonated_user,
            )
            .field("space_cache_ttl_seconds", &self.space_cache_ttl_seconds)
            .field(
                "conference_cache_ttl_seconds",
                &self.conference_cache_ttl_seconds,
            )
            .field("session_secure_cookie", &self.session_secure_cookie)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish_non_exhaustive()
    }
}
