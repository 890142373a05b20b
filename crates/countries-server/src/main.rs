//! Server binary for the country currency exchange API.
//!
//! Wires configuration, logging, the database, and the refresh pipeline
//! into the HTTP server.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `countries-config.yaml` (or `$COUNTRIES_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Connect to `SQLite` and run migrations
//! 4. Seed the refresh marker from the stored data
//! 5. Build the refresher and shared state
//! 6. Serve HTTP until `Ctrl-C`

mod error;

use std::sync::Arc;

use countries_api::{AppState, start_server};
use countries_core::config::LoggingSettings;
use countries_core::{AppConfig, ReadPolicy, RefreshMarker, Refresher};
use countries_db::{CountryStore, Database, DbConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails or the server stops
/// abnormally.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging depends on it, so failures here go
    //    to stderr through the returned error.
    let config = AppConfig::load()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        database = %config.database.url,
        image_path = %config.summary.image_path.display(),
        rederive_on_read = config.query.rederive_on_read,
        "countries-server starting"
    );

    // 3. Connect and migrate.
    let db_config =
        DbConfig::new(&config.database.url).with_max_connections(config.database.max_connections);
    let db = Database::connect(&db_config).await?;
    db.run_migrations().await?;

    // 4. Seed the marker so /status survives restarts.
    let last_refreshed_at = CountryStore::new(db.pool()).latest_refresh().await?;
    info!(last_refreshed_at = ?last_refreshed_at, "Refresh marker seeded");
    let marker = RefreshMarker::with_timestamp(last_refreshed_at);

    // 5. Build the pipeline and shared state.
    let refresher = Refresher::from_config(&config, db.clone(), marker)?;
    let read_policy = ReadPolicy::from_flag(config.query.rederive_on_read);
    let state = Arc::new(AppState::new(db.clone(), refresher, read_policy));

    // 6. Serve.
    let result = start_server(&config.server, state).await;

    db.close().await;
    info!("countries-server stopped");

    result.map_err(AppError::from)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(settings: &LoggingSettings) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if settings.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
