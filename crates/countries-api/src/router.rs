//! Axum router construction.
//!
//! Assembles all routes into a single [`Router`] with CORS and HTTP
//! tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `POST /countries/refresh` -- run the refresh pipeline
/// - `GET /countries` -- list with `region`, `currency`, and `sort` filters
/// - `GET /countries/image` -- the cached summary PNG
/// - `GET /countries/{name}` -- single country by name
/// - `DELETE /countries/{name}` -- delete by name
/// - `GET /status` -- stored count and last refresh time
///
/// The literal `/countries/image` route takes precedence over the
/// `{name}` capture.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/status", get(handlers::status))
        .route("/countries/refresh", post(handlers::refresh))
        .route("/countries", get(handlers::list_countries))
        .route("/countries/image", get(handlers::summary_image))
        .route(
            "/countries/{name}",
            get(handlers::get_country).delete(handlers::delete_country),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
