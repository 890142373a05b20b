//! Payload for `GET /status`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Summary of the stored collection and the last successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StatusReport {
    /// Number of countries currently stored.
    #[ts(type = "number")]
    pub total_countries: u64,
    /// Timestamp of the last successful refresh, `null` before the first one.
    pub last_refreshed_at: Option<String>,
}
