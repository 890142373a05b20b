//! Filtering and sorting over the stored country set.
//!
//! Region and currency filters are case-insensitive exact matches; an
//! absent or empty filter places no constraint on its field, and both
//! filters must hold when both are given. Sorting is by estimated GDP only
//! and is stable, so equal estimates keep their storage order.

use std::cmp::Ordering;

use countries_types::Country;
use serde::Deserialize;

use crate::derive::{RandomMultiplier, rederive};

/// Requested ordering of the list endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep storage order.
    #[default]
    Unsorted,
    /// Highest estimated GDP first (`gdp_desc`).
    GdpDesc,
    /// Lowest estimated GDP first (`gdp_asc`).
    GdpAsc,
}

impl SortOrder {
    /// Parse a `sort` query value. Unknown or empty values mean unsorted.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "gdp_desc" => Self::GdpDesc,
            "gdp_asc" => Self::GdpAsc,
            _ => Self::Unsorted,
        }
    }

    fn apply(self, countries: &mut [Country]) {
        match self {
            Self::Unsorted => {}
            Self::GdpDesc => countries.sort_by(gdp_descending),
            Self::GdpAsc => countries.sort_by(|a, b| a.estimated_gdp.total_cmp(&b.estimated_gdp)),
        }
    }
}

/// Whether reads return the persisted estimate or recompute it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPolicy {
    /// Return `estimated_gdp` exactly as stored by the last refresh.
    #[default]
    Stored,
    /// Draw a fresh multiplier for every country on every read.
    Rederive,
}

impl ReadPolicy {
    /// Map the `query.rederive_on_read` switch to a policy.
    pub const fn from_flag(rederive_on_read: bool) -> Self {
        if rederive_on_read {
            Self::Rederive
        } else {
            Self::Stored
        }
    }

    /// Prepare a freshly read set according to this policy.
    pub fn prepare(self, countries: &mut [Country]) {
        if self == Self::Rederive {
            rederive(countries, &mut RandomMultiplier::from_thread_rng());
        }
    }
}

/// Query parameters of `GET /countries`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CountryQuery {
    /// Region filter.
    pub region: Option<String>,
    /// Currency code filter.
    pub currency: Option<String>,
    /// `gdp_desc`, `gdp_asc`, or anything else for storage order.
    pub sort: Option<String>,
}

impl CountryQuery {
    /// The parsed sort directive.
    pub fn sort_order(&self) -> SortOrder {
        self.sort.as_deref().map_or(SortOrder::Unsorted, SortOrder::parse)
    }

    /// Whether `country` passes both filters.
    pub fn matches(&self, country: &Country) -> bool {
        field_matches(self.region.as_deref(), &country.region)
            && field_matches(self.currency.as_deref(), &country.currency_code)
    }

    /// Filter, then sort.
    pub fn apply(&self, countries: Vec<Country>) -> Vec<Country> {
        let mut filtered: Vec<Country> = countries.into_iter().filter(|c| self.matches(c)).collect();
        self.sort_order().apply(&mut filtered);
        filtered
    }
}

fn field_matches(filter: Option<&str>, value: &str) -> bool {
    match filter.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => wanted.to_lowercase() == value.trim().to_lowercase(),
    }
}

/// Highest estimated GDP first.
pub(crate) fn gdp_descending(a: &Country, b: &Country) -> Ordering {
    b.estimated_gdp.total_cmp(&a.estimated_gdp)
}
