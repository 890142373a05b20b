//! Refresh-and-aggregation pipeline for the country currency exchange API.
//!
//! A refresh fetches country metadata and USD exchange rates, merges them
//! into [`Country`](countries_types::Country) records with an estimated
//! GDP, swaps the stored set atomically, and then paints a summary PNG on
//! a best-effort basis.
//!
//! # Architecture
//!
//! ```text
//! CountrySource --+
//!                 +--> merge (+ GdpMultiplier) --> CountryStore::replace_all
//! RateSource -----+                                   |
//!                                                     +--> RefreshMarker::set
//!                                                     +--> SummaryRenderer (best effort)
//! ```
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with environment overrides
//! - [`sources`] -- HTTP clients for the two upstream APIs
//! - [`derive`] -- Estimated GDP formula and pluggable multiplier strategy
//! - [`merge`] -- Joins countries with rates and stamps the refresh time
//! - [`query`] -- Filtering and sorting over the stored set
//! - [`canvas`] -- Minimal raster drawing on top of `image`
//! - [`summary`] -- Summary image layout and rendering
//! - [`marker`] -- Process-wide last-refresh timestamp
//! - [`refresh`] -- The end-to-end pipeline

pub mod canvas;
pub mod config;
pub mod derive;
pub mod marker;
pub mod merge;
pub mod query;
pub mod refresh;
pub mod sources;
pub mod summary;

// Re-export primary types for convenience.
pub use config::{AppConfig, ConfigError};
pub use derive::{FixedMultiplier, GdpMultiplier, RandomMultiplier};
pub use marker::RefreshMarker;
pub use query::{CountryQuery, ReadPolicy, SortOrder};
pub use refresh::{RefreshError, RefreshReport, Refresher, SummaryOutcome};
pub use sources::{CountrySource, RateSource, SourceError};
pub use summary::{RenderError, SummaryRenderer};
