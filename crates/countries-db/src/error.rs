//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`]. Storage failures and a
//! missing lookup target are separate variants so callers can map them to
//! different responses.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// An `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] sqlx::Error),

    /// A schema migration failed.
    #[error("SQLite migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No stored country matched the requested name.
    #[error("country not found: {0}")]
    NotFound(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Whether this error means the lookup target does not exist, as
    /// opposed to the storage layer failing.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
