//! Exchange rates fetched once per refresh.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Mapping from currency code to units of that currency per one unit of
/// the base currency.
///
/// Lives only for the duration of one refresh and is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RateMap {
    /// Base currency the rates are quoted against (`USD` upstream).
    #[serde(default, rename = "base_code")]
    pub base: String,
    /// Rates keyed by currency code.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
}

impl RateMap {
    /// Build a rate map from `(code, rate)` pairs.
    pub fn from_pairs<I, S>(base: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            base: base.to_owned(),
            rates: pairs
                .into_iter()
                .map(|(code, rate)| (code.into(), rate))
                .collect(),
        }
    }

    /// The rate for `code` if it exists and is strictly positive.
    ///
    /// Zero, negative, and NaN rates are treated as absent.
    pub fn usable_rate(&self, code: &str) -> Option<f64> {
        if code.is_empty() {
            return None;
        }
        self.rates.get(code).copied().filter(|rate| *rate > 0.0)
    }

    /// Number of currencies in the map.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the map holds no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
