//! The merged country record.
//!
//! A [`Country`] is produced by the merge engine from one upstream
//! [`RawCountry`](crate::RawCountry) plus the exchange rate for its first
//! currency. It is the shape persisted in the `countries` table and served
//! by the HTTP API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One country's metadata together with its derived economics.
///
/// Optional numeric data follows the API's omission policy: an empty
/// `currency_code` and a zero `exchange_rate` or `estimated_gdp` are left
/// out of the JSON body entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Country {
    /// Ordinal position in the refresh that produced this record (1-based).
    ///
    /// Not stable across refreshes.
    pub id: i64,
    /// Country name; the natural key for lookups and deletes.
    pub name: String,
    /// Capital city, empty when the upstream record has none.
    #[serde(default)]
    pub capital: String,
    /// Geographic region, empty when the upstream record has none.
    #[serde(default)]
    pub region: String,
    /// Population count.
    #[ts(type = "number")]
    pub population: u64,
    /// Code of the first listed currency, empty when there is none.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub currency_code: String,
    /// Units of `currency_code` per one USD; zero when no usable rate exists.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub exchange_rate: f64,
    /// Estimated GDP in USD; zero whenever the currency or rate is unusable.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub estimated_gdp: f64,
    /// URL of the country's flag image.
    #[serde(default)]
    pub flag_url: String,
    /// RFC 3339 UTC timestamp of the refresh that produced this record.
    pub last_refreshed_at: String,
}

impl Country {
    /// Whether both a currency code and a strictly positive rate are present.
    ///
    /// Only such countries can carry a non-zero estimated GDP.
    pub fn has_usable_rate(&self) -> bool {
        !self.currency_code.is_empty() && self.exchange_rate > 0.0
    }

    /// Case-insensitive, whitespace-trimmed comparison against `name`.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde passes skip predicates by reference
fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Country {
        Country {
            id: 1,
            name: String::from("France"),
            capital: String::from("Paris"),
            region: String::from("Europe"),
            population: 67_391_582,
            currency_code: String::from("EUR"),
            exchange_rate: 0.92,
            estimated_gdp: 1_234.5,
            flag_url: String::from("https://flagcdn.com/fr.svg"),
            last_refreshed_at: String::from("2025-01-01T00:00:00Z"),
        }
    }

    #[test]
    fn serializes_all_fields_when_present() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["currency_code"], "EUR");
        assert_eq!(json["flag_url"], "https://flagcdn.com/fr.svg");
        assert!(json.get("exchange_rate").is_some());
        assert!(json.get("estimated_gdp").is_some());
    }

    #[test]
    fn omits_empty_currency_and_zero_numbers() {
        let country = Country {
            currency_code: String::new(),
            exchange_rate: 0.0,
            estimated_gdp: 0.0,
            ..sample()
        };
        let json = serde_json::to_value(country).unwrap();
        assert!(json.get("currency_code").is_none());
        assert!(json.get("exchange_rate").is_none());
        assert!(json.get("estimated_gdp").is_none());
        // Non-optional fields stay even when empty-ish.
        assert_eq!(json["population"], 67_391_582);
    }

    #[test]
    fn deserializes_omitted_fields_as_defaults() {
        let json = r#"{
            "id": 3,
            "name": "Antarctica",
            "population": 1000,
            "last_refreshed_at": "2025-01-01T00:00:00Z"
        }"#;
        let country: Country = serde_json::from_str(json).unwrap();
        assert_eq!(country.name, "Antarctica");
        assert!(country.currency_code.is_empty());
        assert!(!country.has_usable_rate());
    }

    #[test]
    fn name_matching_ignores_case_and_padding() {
        let country = Country {
            name: String::from(" france "),
            ..sample()
        };
        assert!(country.name_matches("France"));
        assert!(country.name_matches("  FRANCE"));
        assert!(!country.name_matches("Franc"));
    }
}
