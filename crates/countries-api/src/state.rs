//! Shared application state.

use countries_core::{ReadPolicy, RefreshMarker, Refresher, SummaryRenderer};
use countries_db::Database;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The database handle is a pool and clones cheaply.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Connection pool for the country store.
    pub db: Database,
    /// The refresh pipeline, which also owns the marker and renderer.
    pub refresher: Refresher,
    /// Whether reads return stored estimates or draw fresh ones.
    pub read_policy: ReadPolicy,
}

impl AppState {
    /// Create application state from its parts.
    pub const fn new(db: Database, refresher: Refresher, read_policy: ReadPolicy) -> Self {
        Self {
            db,
            refresher,
            read_policy,
        }
    }

    /// The last-refresh marker shared with the refresher.
    pub const fn marker(&self) -> &RefreshMarker {
        self.refresher.marker()
    }

    /// The renderer whose output backs `GET /countries/image`.
    pub const fn renderer(&self) -> &SummaryRenderer {
        self.refresher.renderer()
    }
}
