//! `SQLite` connection pool and configuration.
//!
//! Uses [`sqlx`] with runtime query construction (not compile-time checked)
//! so the workspace builds without a live database. All queries are
//! parameterized.

use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::DbError;

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Default maximum number of connections in the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default connection timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default idle timeout in seconds.
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 300;

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// Configuration for the `SQLite` connection pool.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `SQLite` connection URL.
    ///
    /// Format: `sqlite://path/to/file.db` or `sqlite::memory:`
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Idle connection timeout. `None` keeps idle connections forever.
    pub idle_timeout: Option<Duration>,
}

impl DbConfig {
    /// Create a new configuration from a database URL.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
        }
    }

    /// Configuration for a private in-memory database.
    ///
    /// Every `SQLite` memory connection is its own database, so the pool is
    /// pinned to a single connection that is never reaped.
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_URL.to_owned(),
            max_connections: 1,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            idle_timeout: None,
        }
    }

    /// Set the maximum number of connections.
    #[must_use]
    pub const fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Connection pool handle to `SQLite`.
///
/// Wraps a [`sqlx::SqlitePool`]; cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to `SQLite` using the provided configuration.
    ///
    /// File databases are created when missing.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Sqlite`] if the connection fails.
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    pub async fn connect(config: &DbConfig) -> Result<Self, DbError> {
        let connect_options: SqliteConnectOptions = config
            .url
            .parse()
            .map_err(|e: sqlx::Error| DbError::Config(format!("Invalid database URL: {e}")))?;
        let connect_options = connect_options
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if config.is_in_memory() {
            pool_options = pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }

        let pool = pool_options.connect_with(connect_options).await?;

        tracing::info!(
            max_connections = config.max_connections,
            in_memory = config.is_in_memory(),
            "Connected to SQLite"
        );

        Ok(Self { pool })
    }

    /// Open a fresh in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    pub async fn in_memory() -> Result<Self, DbError> {
        let db = Self::connect(&DbConfig::in_memory()).await?;
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run all pending migrations from the `migrations/` directory.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migration`] if any migration fails.
    pub async fn run_migrations(&self) -> Result<(), DbError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Return a reference to the underlying [`SqlitePool`].
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections in the pool gracefully.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("SQLite pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = DbConfig::new("sqlite://countries.db");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.idle_timeout, Some(Duration::from_secs(300)));
        assert!(!config.is_in_memory());
    }

    #[test]
    fn in_memory_config_is_single_connection() {
        let config = DbConfig::in_memory();
        assert_eq!(config.max_connections, 1);
        assert!(config.idle_timeout.is_none());
        assert!(config.is_in_memory());
    }

    #[test]
    fn builder_overrides() {
        let config = DbConfig::new("sqlite://x.db")
            .with_max_connections(2)
            .with_connect_timeout(Duration::from_secs(1));
        assert_eq!(config.max_connections, 2);
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }
}
