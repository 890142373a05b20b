//! Data layer for the country currency exchange API (`SQLite`).
//!
//! The store holds exactly one generation of countries: the set written by
//! the most recent successful refresh. A refresh never updates rows in
//! place; it swaps the whole table contents inside one transaction so
//! readers see either the old set or the new one.
//!
//! # Modules
//!
//! - [`sqlite`] -- `SQLite` connection pool, configuration, and migrations
//! - [`country_store`] -- Replace, read, count, and delete operations on
//!   the `countries` table
//! - [`error`] -- Shared error types

pub mod country_store;
pub mod error;
pub mod sqlite;

// Re-export primary types for convenience.
pub use country_store::{CountryRow, CountryStore};
pub use error::DbError;
pub use sqlite::{Database, DbConfig};
