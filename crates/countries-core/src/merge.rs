//! Merge country metadata with exchange rates.

use chrono::{DateTime, SecondsFormat, Utc};
use countries_types::{Country, RateMap, RawCountry};

use crate::derive::{GdpMultiplier, estimate_gdp};

/// Format the shared refresh timestamp (RFC 3339, UTC, whole seconds).
pub fn refresh_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Join raw countries with the rate map.
///
/// For each country, in source order:
///
/// 1. `id` is its 1-based position.
/// 2. `currency_code` is the first listed currency's code, or empty.
/// 3. `exchange_rate` is the map entry if strictly positive, else `0.0`.
/// 4. `estimated_gdp` is derived with `multiplier` when a rate was found,
///    else `0.0`.
/// 5. `last_refreshed_at` is `refreshed_at`, identical across the batch.
///
/// Missing currencies or rates never fail the merge; they only zero the
/// estimate.
pub fn merge(
    raw: Vec<RawCountry>,
    rates: &RateMap,
    refreshed_at: &str,
    multiplier: &mut impl GdpMultiplier,
) -> Vec<Country> {
    (1_i64..)
        .zip(raw)
        .map(|(id, raw)| {
            let currency_code = raw.primary_currency_code().to_owned();
            let exchange_rate = rates.usable_rate(&currency_code).unwrap_or(0.0);
            let estimated_gdp =
                estimate_gdp(&currency_code, raw.population, exchange_rate, multiplier);

            Country {
                id,
                name: raw.name,
                capital: raw.capital,
                region: raw.region,
                population: raw.population,
                currency_code,
                exchange_rate,
                estimated_gdp,
                flag_url: raw.flag,
                last_refreshed_at: refreshed_at.to_owned(),
            }
        })
        .collect()
}
