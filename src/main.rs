// ABOUTME: Entry point for the eventday binary.
// ABOUTME: Loads config and lookup tables, opens the registration log, serves the HTTP API.

use std::sync::Arc;

use anyhow::Context;
use eventday_core::{EventCatalog, FellowDirectory, RegistrationService, SystemClock};
use eventday_server::{AppState, ServerConfig, create_router};
use eventday_store::JsonlStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventday=debug,tower_http=debug".parse().unwrap()),
        )
        .init();

    let config = ServerConfig::from_env()?;

    let directory = FellowDirectory::load(&config.fellows_path).with_context(|| {
        format!(
            "loading fellow directory from {}",
            config.fellows_path.display()
        )
    })?;
    let catalog = EventCatalog::load(&config.events_path)
        .with_context(|| format!("loading event catalog from {}", config.events_path.display()))?;
    let store = Arc::new(
        JsonlStore::open(&config.log_path)
            .with_context(|| format!("opening registration log at {}", config.log_path.display()))?,
    );

    let service = RegistrationService::new(
        store,
        directory,
        catalog,
        Arc::new(SystemClock),
        chrono::Duration::seconds(config.cache_ttl_secs as i64),
    );
    let state = Arc::new(AppState::new(service));

    let app = create_router(state);
    tracing::info!(bind = %config.bind, log = %config.log_path.display(), "eventday listening");

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
