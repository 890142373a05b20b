//! REST endpoint handlers.
//!
//! Every read goes through [`CountryStore`]; nothing is cached in memory
//! except the refresh marker.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/countries/refresh` | Run the refresh pipeline |
//! | `GET` | `/countries` | List countries (filter + sort) |
//! | `GET` | `/countries/image` | Cached summary PNG |
//! | `GET` | `/countries/{name}` | Single country by name |
//! | `DELETE` | `/countries/{name}` | Delete by name |
//! | `GET` | `/status` | Stored count and last refresh |

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use countries_core::CountryQuery;
use countries_db::{CountryStore, DbError};
use countries_types::{Country, StatusReport};

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /countries/refresh
// ---------------------------------------------------------------------------

/// Fetch both upstream APIs, replace the stored set, and redraw the summary.
///
/// A summary render failure is logged by the pipeline and does not change
/// the response.
pub async fn refresh(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let report = state.refresher.run().await?;

    Ok(Json(serde_json::json!({
        "message": "Country data refreshed successfully",
        "total_countries": report.total_countries,
        "last_refreshed_at": report.refreshed_at,
    })))
}

// ---------------------------------------------------------------------------
// GET /countries
// ---------------------------------------------------------------------------

/// List stored countries, optionally filtered by `region` and `currency`
/// and sorted by `sort=gdp_desc|gdp_asc`.
pub async fn list_countries(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountryQuery>,
) -> Result<Json<Vec<Country>>, ApiError> {
    let mut countries = CountryStore::new(state.db.pool()).find_all().await?;
    state.read_policy.prepare(&mut countries);

    Ok(Json(query.apply(countries)))
}

// ---------------------------------------------------------------------------
// GET /countries/{name}
// ---------------------------------------------------------------------------

/// Return the first country whose name matches, ignoring case and
/// surrounding whitespace.
pub async fn get_country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Country>, ApiError> {
    require_name(&name)?;
    let store = CountryStore::new(state.db.pool());

    let Some(mut country) = store.find_by_name(&name).await? else {
        if store.count_all().await? == 0 {
            return Err(ApiError::EmptyStore);
        }
        return Err(ApiError::CountryNotFound { searched_for: name });
    };

    state.read_policy.prepare(std::slice::from_mut(&mut country));
    Ok(Json(country))
}

// ---------------------------------------------------------------------------
// DELETE /countries/{name}
// ---------------------------------------------------------------------------

/// Delete the first country whose name matches.
pub async fn delete_country(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_name(&name)?;

    let deleted = CountryStore::new(state.db.pool())
        .delete_by_name(&name)
        .await
        .map_err(|e| match e {
            DbError::NotFound(_) => ApiError::NotFound(String::from("Country not found")),
            other => ApiError::Database(other),
        })?;

    tracing::info!(name = %deleted.name, id = deleted.id, "Country deleted");

    Ok(Json(serde_json::json!({
        "message": format!("Country '{}' deleted successfully", deleted.name),
    })))
}

// ---------------------------------------------------------------------------
// GET /status
// ---------------------------------------------------------------------------

/// Report the stored count and the last successful refresh time.
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusReport>, ApiError> {
    let total_countries = CountryStore::new(state.db.pool()).count_all().await?;

    Ok(Json(StatusReport {
        total_countries,
        last_refreshed_at: state.marker().get().await,
    }))
}

// ---------------------------------------------------------------------------
// GET /countries/image
// ---------------------------------------------------------------------------

/// Serve the summary PNG written by the last refresh.
pub async fn summary_image(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state
        .renderer()
        .load()
        .await
        .map_err(|e| ApiError::Internal(format!("failed to read summary image: {e}")))?
        .ok_or_else(|| ApiError::NotFound(String::from("Summary image not found")))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest(String::from("Country name is required")));
    }
    Ok(())
}
