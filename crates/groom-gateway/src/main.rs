//! groom gateway
//!
//! This is the main entry point for the gateway service. All configuration
//! comes from environment variables; see `GatewayConfig::from_env`.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groom_auth::{GoogleIdentityProvider, IdentityGate};
use groom_control::RoomService;
use groom_gateway::{create_router, GatewayConfig, GatewayState};
use groom_meet::{GoogleMeetApi, MeetDirectory, ServiceAccountKey, ServiceAccountTokenSource};
use groom_store::PgStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,groom=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting groom gateway");

    // Load configuration from environment
    let config = GatewayConfig::from_env()?;
    tracing::info!(config = ?config, "Gateway configuration loaded");

    // Initialize store
    let store = Arc::new(PgStore::connect(&config.database_url).await?);
    store.ensure_schema().await?;
    tracing::info!("Connected to PostgreSQL");

    // Initialize Meet client
    let key = ServiceAccountKey::from_file(&config.service_account_credentials_file)?;
    let tokens = Arc::new(ServiceAccountTokenSource::new(
        key,
        config.service_account_impersonated_user.clone(),
    )?);
    let api = Arc::new(GoogleMeetApi::new(tokens)?);
    let directory = MeetDirectory::new(api, config.directory_config());
    let rooms = Arc::new(RoomService::new(store, directory));
    tracing::info!("Meet directory initialized");

    // Initialize identity gate
    let provider = Arc::new(GoogleIdentityProvider::new(config.auth_config())?);
    let gate = IdentityGate::new(provider, config.workspace_domain.clone());
    tracing::info!(domain = %gate.domain(), "Identity gate initialized");

    // Create the router
    let listen_addr = config.listen_addr();
    let app = create_router(GatewayState::new(rooms, gate, config));

    // Start HTTP server
    tracing::info!(listen_addr = %listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
