//! Upstream country metadata.
//!
//! Mirrors the subset of the REST Countries v2 payload requested with
//! `fields=name,capital,region,population,flag,currencies`. Every field
//! except `name` is optional upstream (Antarctica has no capital, several
//! territories have no currencies), so all of them default when absent or
//! `null`.

use serde::{Deserialize, Deserializer};

/// One country as delivered by the upstream metadata API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCountry {
    /// Common English name.
    pub name: String,
    /// Capital city.
    #[serde(default, deserialize_with = "null_as_default")]
    pub capital: String,
    /// Geographic region (`Europe`, `Africa`, ...).
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    /// Population count.
    #[serde(default, deserialize_with = "null_as_default")]
    pub population: u64,
    /// Currencies in upstream order; only the first one is used.
    #[serde(default, deserialize_with = "null_as_default")]
    pub currencies: Vec<RawCurrency>,
    /// Flag image URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub flag: String,
}

impl RawCountry {
    /// Code of the first listed currency, or `""` when none is listed.
    pub fn primary_currency_code(&self) -> &str {
        self.currencies
            .first()
            .map_or("", |currency| currency.code.as_str())
    }
}

/// A currency entry within a [`RawCountry`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCurrency {
    /// ISO 4217 code, e.g. `EUR`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    /// Display name, e.g. `Euro`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Display symbol, e.g. `€`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub symbol: String,
}

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
