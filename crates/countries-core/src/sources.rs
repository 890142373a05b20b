//! HTTP clients for the two upstream APIs.
//!
//! Both clients issue exactly one GET per call and never retry. Transport
//! errors, non-success statuses, and undecodable bodies all surface as
//! [`SourceError::Unavailable`] so the refresh aborts before anything is
//! written.

use std::time::Duration;

use countries_types::{RateMap, RawCountry};
use serde::de::DeserializeOwned;

use crate::config::SourceSettings;

/// Errors raised while talking to an upstream API.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The upstream call failed or returned something unusable.
    #[error("{source_name} unavailable: {message}")]
    Unavailable {
        /// Which upstream failed (`countries` or `exchange rates`).
        source_name: &'static str,
        /// What went wrong.
        message: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Build the shared HTTP client with a bounded per-request timeout.
///
/// # Errors
///
/// Returns [`SourceError::Client`] if the TLS backend cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, SourceError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SourceError::Client(e.to_string()))
}

/// Client for the country metadata API (REST Countries v2).
#[derive(Debug, Clone)]
pub struct CountrySource {
    client: reqwest::Client,
    url: String,
}

impl CountrySource {
    const NAME: &'static str = "countries";

    /// Create a client that fetches from `url`.
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }

    /// Fetch every country, in upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] on network, status, or decode
    /// failure.
    pub async fn fetch(&self) -> Result<Vec<RawCountry>, SourceError> {
        let countries: Vec<RawCountry> = get_json(&self.client, &self.url, Self::NAME).await?;
        tracing::debug!(count = countries.len(), "Fetched country metadata");
        Ok(countries)
    }
}

/// Client for the exchange rate API (`open.er-api.com`, USD base).
#[derive(Debug, Clone)]
pub struct RateSource {
    client: reqwest::Client,
    url: String,
}

impl RateSource {
    const NAME: &'static str = "exchange rates";

    /// Create a client that fetches from `url`.
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_owned(),
        }
    }

    /// Fetch the current rate map.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] on network, status, or decode
    /// failure.
    pub async fn fetch(&self) -> Result<RateMap, SourceError> {
        let rates: RateMap = get_json(&self.client, &self.url, Self::NAME).await?;
        tracing::debug!(count = rates.len(), base = %rates.base, "Fetched exchange rates");
        Ok(rates)
    }
}

/// Build both upstream clients from configuration, sharing one HTTP client.
///
/// # Errors
///
/// Returns [`SourceError::Client`] if the HTTP client cannot be built.
pub fn from_settings(settings: &SourceSettings) -> Result<(CountrySource, RateSource), SourceError> {
    let client = http_client(settings.timeout())?;
    Ok((
        CountrySource::new(client.clone(), &settings.countries_url),
        RateSource::new(client, &settings.rates_url),
    ))
}

async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    source_name: &'static str,
) -> Result<T, SourceError> {
    let unavailable = |message: String| SourceError::Unavailable {
        source_name,
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| unavailable(format!("request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(unavailable(format!("returned {status}")));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| unavailable(format!("response decode failed: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> reqwest::Client {
        http_client(Duration::from_secs(5)).unwrap()
    }

    async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetches_countries_in_order() {
        let server = MockServer::start().await;
        let body = r#"[
            {"name": "Ghana", "capital": "Accra", "region": "Africa", "population": 31072940,
             "flag": "https://flagcdn.com/gh.svg",
             "currencies": [{"code": "GHS", "name": "Ghanaian cedi", "symbol": "₵"}]},
            {"name": "Antarctica", "region": "Polar", "population": 1000}
        ]"#;
        mount(&server, "/v2/all", ResponseTemplate::new(200).set_body_string(body)).await;

        let source = CountrySource::new(client(), &format!("{}/v2/all", server.uri()));
        let countries = source.fetch().await.unwrap();

        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "Ghana");
        assert_eq!(countries[0].primary_currency_code(), "GHS");
        assert_eq!(countries[1].name, "Antarctica");
    }

    #[tokio::test]
    async fn fetches_rates() {
        let server = MockServer::start().await;
        let body = r#"{"result": "success", "base_code": "USD", "rates": {"USD": 1, "GHS": 15.3}}"#;
        mount(&server, "/v6/latest/USD", ResponseTemplate::new(200).set_body_string(body)).await;

        let source = RateSource::new(client(), &format!("{}/v6/latest/USD", server.uri()));
        let rates = source.fetch().await.unwrap();

        assert_eq!(rates.base, "USD");
        assert_eq!(rates.usable_rate("GHS"), Some(15.3));
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let server = MockServer::start().await;
        mount(&server, "/v6/latest/USD", ResponseTemplate::new(503)).await;

        let source = RateSource::new(client(), &format!("{}/v6/latest/USD", server.uri()));
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(
            err,
            SourceError::Unavailable { source_name: "exchange rates", ref message } if message.contains("503")
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_unavailable() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/v2/all",
            ResponseTemplate::new(200).set_body_string(r#"{"message": "not an array"}"#),
        )
        .await;

        let source = CountrySource::new(client(), &format!("{}/v2/all", server.uri()));
        let err = source.fetch().await.unwrap_err();

        assert!(matches!(
            err,
            SourceError::Unavailable { source_name: "countries", ref message } if message.contains("decode")
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        // Nothing listens on port 9 (discard) locally.
        let source = CountrySource::new(client(), "http://127.0.0.1:9/v2/all");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn slow_upstream_hits_timeout() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/v2/all",
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_millis(500)),
        )
        .await;

        let client = http_client(Duration::from_millis(50)).unwrap();
        let source = CountrySource::new(client, &format!("{}/v2/all", server.uri()));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Unavailable { .. }));
    }

    #[test]
    fn builds_clients_from_settings() {
        let settings = SourceSettings::default();
        let (countries, rates) = from_settings(&settings).unwrap();
        assert_eq!(countries.url, settings.countries_url);
        assert_eq!(rates.url, settings.rates_url);
    }
}
