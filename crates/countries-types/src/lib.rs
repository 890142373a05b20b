//! Shared type definitions for the country currency exchange API.
//!
//! This crate is the single source of truth for the records that flow
//! between the upstream clients, the merge engine, the store, and the
//! HTTP layer. Types served over HTTP are exported to `TypeScript` via
//! `ts-rs` for API consumers.
//!
//! # Modules
//!
//! - [`country`] -- The merged, persisted [`Country`] record
//! - [`raw`] -- Upstream country metadata as delivered by REST Countries
//! - [`rates`] -- The transient [`RateMap`] fetched per refresh
//! - [`status`] -- The `GET /status` payload

pub mod country;
pub mod rates;
pub mod raw;
pub mod status;

// Re-export all public types at crate root for convenience.
pub use country::Country;
pub use rates::RateMap;
pub use raw::{RawCountry, RawCurrency};
pub use status::StatusReport;
