//! groom legacy migrator
//!
//! Rewrites rooms that still store a bare meeting code so that they point at
//! the canonical `spaces/{id}` resource name. Safe to run repeatedly.

use std::sync::Arc;

use groom_control::Migrator;
use groom_meet::{
    DirectoryConfig, GoogleMeetApi, MeetDirectory, ServiceAccountKey, ServiceAccountTokenSource,
};
use groom_store::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn required_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("missing required environment variable {name}").into()),
    }
}

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

    tracing::info!("Starting groom legacy migration");

    // Load configuration from environment
    let database_url = required_env("DATABASE_URL")?;
    let credentials_file = std::env::var("GOOGLE_SERVICE_ACCOUNT_CREDENTIALS_FILE")
        .unwrap_or_else(|_| "./service_account.json".to_string());
    let impersonated_user = required_env("GOOGLE_SERVICE_ACCOUNT_IMPERSONATED_USER")?;

    // Initialize store
    let store = Arc::new(PgStore::connect(&database_url).await?);
    tracing::info!("Connected to PostgreSQL");

    // Initialize Meet client
    let key = ServiceAccountKey::from_file(&credentials_file)?;
    let tokens = Arc::new(ServiceAccountTokenSource::new(key, impersonated_user)?);
    let api = Arc::new(GoogleMeetApi::new(tokens)?);
    let directory = MeetDirectory::new(api, DirectoryConfig::default());

    let report = Migrator::new(store, directory).migrate_all().await?;

    if report.failed > 0 {
        tracing::warn!(failed = report.failed, "Some rooms could not be migrated; rerun after fixing them");
    }

    Ok(())
}
