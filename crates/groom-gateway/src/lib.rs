//! HTTP gateway for groom.
//!
//! This crate provides the public-facing surface that turns short room slugs
//! into Google Meet redirects. It handles:
//!
//! - Domain-restricted Google login with cookie sessions
//! - Slug redirects and an HTML room directory with live occupancy
//! - An API-key protected JSON API for room management
//! - Health checks for the store and the Meet API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Clients                              │
//! │              (browsers / automation with API key)           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      groom-gateway                          │
//! │  ┌─────────────┐ ┌─────────────┐ ┌─────────────────────┐    │
//! │  │  Session /  │ │   Router    │ │    Session          │    │
//! │  │  API key    │ │  + Handlers │ │    Store            │    │
//! │  └─────────────┘ └─────────────┘ └─────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┼──────────────┐
//!               ▼              ▼              ▼
//!        ┌──────────┐   ┌──────────┐   ┌──────────┐
//!        │  Room    │   │ Identity │   │   Meet   │
//!        │ Control  │   │   Gate   │   │   API    │
//!        └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use groom_gateway::{GatewayConfig, GatewayState, create_router};
//! use groom_auth::{GoogleIdentityProvider, IdentityGate};
//! use groom_control::RoomService;
//! use groom_meet::{GoogleMeetApi, MeetDirectory, StaticTokenSource};
//! use groom_store::PgStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::from_env()?;
//!
//! // Initialize dependencies
//! let store = Arc::new(PgStore::connect(&config.database_url).await?);
//! let tokens = Arc::new(StaticTokenSource::new("ya29.token"));
//! let api = Arc::new(GoogleMeetApi::new(tokens)?);
//! let directory = MeetDirectory::new(api, config.directory_config());
//! let rooms = Arc::new(RoomService::new(store, directory));
//!
//! let provider = Arc::new(GoogleIdentityProvider::new(config.auth_config())?);
//! let gate = IdentityGate::new(provider, config.workspace_domain.clone());
//!
//! // Create router
//! let listen_addr = config.listen_addr();
//! let app = create_router(GatewayState::new(rooms, gate, config));
//!
//! // Run server
//! let listener = tokio::net::TcpListener::bind(listen_addr).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::{ConfigError, GatewayConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use state::GatewayState;

// Re-export key types for convenience
pub use auth::{ApiKey, AuthUser};
