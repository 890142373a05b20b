//! Error types for the server binary.
//!
//! [`AppError`] wraps every failure mode during startup and serving so
//! `main` can propagate with `?`.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: countries_core::ConfigError,
    },

    /// Connecting to or migrating the database failed.
    #[error("database error: {source}")]
    Database {
        /// The underlying database error.
        #[from]
        source: countries_db::DbError,
    },

    /// The upstream HTTP client could not be built.
    #[error("source error: {source}")]
    Source {
        /// The underlying source error.
        #[from]
        source: countries_core::SourceError,
    },

    /// The HTTP server failed to start or stopped abnormally.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: countries_api::ServerError,
    },
}
