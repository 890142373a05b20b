//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies every failure a handler can return and converts
//! into a JSON response of the form `{"error": ..., "status": ...}` via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use countries_core::RefreshError;
use countries_db::DbError;

/// Message returned when a lookup runs against an empty store.
pub const EMPTY_STORE_MESSAGE: &str =
    "No countries in database. Please call POST /countries/refresh first";

/// Errors that can occur while handling a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A generic resource was not found.
    #[error("{0}")]
    NotFound(String),

    /// No stored country matches the requested name.
    #[error("Country not found")]
    CountryNotFound {
        /// The name as it appeared in the request path.
        searched_for: String,
    },

    /// A lookup ran before any refresh populated the store.
    #[error("{EMPTY_STORE_MESSAGE}")]
    EmptyStore,

    /// The request was malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The refresh pipeline failed.
    #[error("{0}")]
    Refresh(#[from] RefreshError),

    /// A storage operation failed.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// Any other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// The HTTP status this error maps to.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::CountryNotFound { .. } | Self::EmptyStore => {
                StatusCode::NOT_FOUND
            }
            Self::Database(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Refresh(_) | Self::Database(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });
        if let Self::CountryNotFound { searched_for } = self {
            body["searched_for"] = serde_json::Value::String(searched_for);
        }

        (status, axum::Json(body)).into_response()
    }
}
