//! The refresh pipeline.
//!
//! ```text
//! fetch countries ─┐
//!                  ├─ merge ─ replace_all ─ marker.set ─ render (best effort)
//! fetch rates ─────┘
//! ```
//!
//! The two fetches are independent and run concurrently. A source or
//! storage failure aborts the refresh with the stored set and the marker
//! untouched. A render failure is captured in the report and logged; the
//! refresh still succeeds.

use std::path::PathBuf;

use chrono::Utc;
use countries_db::{CountryStore, Database, DbError};
use countries_types::Country;

use crate::config::AppConfig;
use crate::derive::{GdpMultiplier, RandomMultiplier};
use crate::marker::RefreshMarker;
use crate::merge::{merge, refresh_timestamp};
use crate::sources::{self, CountrySource, RateSource, SourceError};
use crate::summary::{RenderError, SummaryRenderer};

/// Errors that abort a refresh.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// An upstream API could not be reached or decoded.
    #[error("{0}")]
    SourceUnavailable(#[from] SourceError),

    /// Persisting the merged set failed; the previous set is intact.
    #[error("failed to store countries: {0}")]
    Storage(#[from] DbError),
}

/// What happened to the summary image during a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The image was written to this path.
    Rendered(PathBuf),
    /// Rendering failed with this message; the refresh itself succeeded.
    Failed(String),
}

/// Result of a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Number of countries now stored.
    pub total_countries: usize,
    /// How many of them have a positive estimated GDP.
    pub with_estimated_gdp: usize,
    /// Timestamp stamped on every country and on the marker.
    pub refreshed_at: String,
    /// Outcome of the best-effort summary render.
    pub summary: SummaryOutcome,
}

/// Runs the refresh pipeline against the configured sources and store.
#[derive(Debug, Clone)]
pub struct Refresher {
    countries: CountrySource,
    rates: RateSource,
    db: Database,
    renderer: SummaryRenderer,
    marker: RefreshMarker,
}

impl Refresher {
    /// Assemble a refresher from its parts.
    pub const fn new(
        countries: CountrySource,
        rates: RateSource,
        db: Database,
        renderer: SummaryRenderer,
        marker: RefreshMarker,
    ) -> Self {
        Self {
            countries,
            rates,
            db,
            renderer,
            marker,
        }
    }

    /// Build a refresher from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Client`] if the HTTP client cannot be built.
    pub fn from_config(
        config: &AppConfig,
        db: Database,
        marker: RefreshMarker,
    ) -> Result<Self, SourceError> {
        let (countries, rates) = sources::from_settings(&config.sources)?;
        let renderer = SummaryRenderer::new(config.summary.image_path.clone());
        Ok(Self::new(countries, rates, db, renderer, marker))
    }

    /// The renderer whose output `GET /countries/image` serves.
    pub const fn renderer(&self) -> &SummaryRenderer {
        &self.renderer
    }

    /// The marker this refresher updates.
    pub const fn marker(&self) -> &RefreshMarker {
        &self.marker
    }

    /// Run a refresh with randomly drawn GDP multipliers.
    ///
    /// # Errors
    ///
    /// See [`Refresher::run_with`].
    pub async fn run(&self) -> Result<RefreshReport, RefreshError> {
        self.run_with(&mut RandomMultiplier::from_thread_rng()).await
    }

    /// Run a refresh drawing multipliers from `multiplier`.
    ///
    /// # Errors
    ///
    /// Returns [`RefreshError::SourceUnavailable`] if either fetch fails
    /// and [`RefreshError::Storage`] if the replace fails. Nothing is
    /// changed in either case.
    pub async fn run_with<M>(&self, multiplier: &mut M) -> Result<RefreshReport, RefreshError>
    where
        M: GdpMultiplier + Send,
    {
        tracing::info!("Refreshing country data");

        let (raw, rates) = tokio::join!(self.countries.fetch(), self.rates.fetch());
        let raw = raw?;
        let rates = rates?;
        tracing::info!(countries = raw.len(), rates = rates.len(), "Upstream data fetched");

        let refreshed_at = refresh_timestamp(Utc::now());
        let merged = merge(raw, &rates, &refreshed_at, multiplier);

        CountryStore::new(self.db.pool()).replace_all(&merged).await?;
        self.marker.set(refreshed_at.clone()).await;

        let total_countries = merged.len();
        let with_estimated_gdp = merged.iter().filter(|c| c.estimated_gdp > 0.0).count();
        let summary = self.render_summary(merged, refreshed_at.clone()).await;

        tracing::info!(
            total_countries,
            with_estimated_gdp,
            refreshed_at = %refreshed_at,
            "Refresh complete"
        );

        Ok(RefreshReport {
            total_countries,
            with_estimated_gdp,
            refreshed_at,
            summary,
        })
    }

    /// Attempt the render, capture its outcome, and carry on.
    async fn render_summary(&self, countries: Vec<Country>, refreshed_at: String) -> SummaryOutcome {
        let renderer = self.renderer.clone();
        let result = tokio::task::spawn_blocking(move || renderer.render(&countries, &refreshed_at))
            .await
            .unwrap_or_else(|e| Err(RenderError::Task(e.to_string())));

        match result {
            Ok(path) => SummaryOutcome::Rendered(path),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to generate summary image");
                SummaryOutcome::Failed(e.to_string())
            }
        }
    }
}
