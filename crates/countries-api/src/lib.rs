//! HTTP surface for the country currency exchange API.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Refresh** (`POST /countries/refresh`) which runs the full
//!   fetch-merge-store-render pipeline
//! - **Read endpoints** for listing, filtering, and sorting countries and
//!   for single lookups by name
//! - **Delete** by name
//! - **Status** with the stored count and the last refresh time
//! - **Summary image** serving the PNG written by the last refresh
//!
//! # Architecture
//!
//! Handlers share an [`AppState`] holding the database handle and the
//! [`Refresher`](countries_core::Refresher). Every read goes to the
//! store; the only in-memory state is the
//! [`RefreshMarker`](countries_core::RefreshMarker).

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerError, bind, serve_until, start_server};
pub use state::AppState;
