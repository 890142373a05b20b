//! Integration tests for the HTTP endpoints.
//!
//! Most tests drive the Axum `Router` directly via `tower::ServiceExt`;
//! one binds a loopback port to exercise the real listener. Upstream APIs
//! are served by `wiremock` and the store is an in-memory `SQLite` database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use countries_api::router::build_router;
use countries_api::server::{bind, serve_until};
use countries_api::state::AppState;
use countries_core::config::ServerSettings;
use countries_core::sources::http_client;
use countries_core::{
    CountrySource, RateSource, ReadPolicy, RefreshMarker, Refresher, SummaryRenderer,
};
use countries_db::Database;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COUNTRIES_PATH: &str = "/v2/all";
const RATES_PATH: &str = "/v6/latest/USD";

struct TestApp {
    router: Router,
    upstream: MockServer,
    _cache: TempDir,
}

async fn make_test_state() -> (Arc<AppState>, MockServer, TempDir) {
    let upstream = MockServer::start().await;
    let cache = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();

    let client = http_client(Duration::from_secs(5)).unwrap();
    let refresher = Refresher::new(
        CountrySource::new(client.clone(), &format!("{}{COUNTRIES_PATH}", upstream.uri())),
        RateSource::new(client, &format!("{}{RATES_PATH}", upstream.uri())),
        db.clone(),
        SummaryRenderer::new(cache.path().join("summary.png")),
        RefreshMarker::new(),
    );
    let state = Arc::new(AppState::new(db, refresher, ReadPolicy::Stored));

    (state, upstream, cache)
}

async fn make_test_app() -> TestApp {
    let (state, upstream, cache) = make_test_state().await;
    TestApp {
        router: build_router(state),
        upstream,
        _cache: cache,
    }
}

impl TestApp {
    async fn mount_upstream(&self) {
        Mock::given(method("GET"))
            .and(path(COUNTRIES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Nigeria", "capital": "Abuja", "region": "Africa", "population": 206_139_589,
                 "flag": "https://flagcdn.com/ng.svg", "currencies": [{"code": "NGN", "name": "Naira", "symbol": "₦"}]},
                {"name": "Ghana", "capital": "Accra", "region": "Africa", "population": 31_072_940,
                 "flag": "https://flagcdn.com/gh.svg", "currencies": [{"code": "GHS"}]},
                {"name": "France", "capital": "Paris", "region": "Europe", "population": 67_391_582,
                 "flag": "https://flagcdn.com/fr.svg", "currencies": [{"code": "EUR"}]},
                {"name": "Antarctica", "region": "Polar", "population": 1000, "currencies": []}
            ])))
            .mount(&self.upstream)
            .await;
        Mock::given(method("GET"))
            .and(path(RATES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "base_code": "USD",
                "rates": {"USD": 1.0, "NGN": 1600.0, "GHS": 15.5, "EUR": 0.92}
            })))
            .mount(&self.upstream)
            .await;
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn refresh(&self) -> Response<Body> {
        self.send(Request::post("/countries/refresh").body(Body::empty()).unwrap())
            .await
    }
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn names(json: &Value) -> Vec<&str> {
    json.as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect()
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_status_before_refresh() {
    let app = make_test_app().await;

    let response = app.get("/status").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["total_countries"], 0);
    assert!(json["last_refreshed_at"].is_null());
}

#[tokio::test]
async fn test_get_country_on_empty_store() {
    let app = make_test_app().await;

    let response = app.get("/countries/Nigeria").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(
        json["error"],
        "No countries in database. Please call POST /countries/refresh first"
    );
    assert_eq!(json["status"], 404);
}

#[tokio::test]
async fn test_refresh_then_status() {
    let app = make_test_app().await;
    app.mount_upstream().await;

    let response = app.refresh().await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_to_json(response.into_body()).await;
    assert_eq!(refreshed["message"], "Country data refreshed successfully");
    assert_eq!(refreshed["total_countries"], 4);

    let json = body_to_json(app.get("/status").await.into_body()).await;
    assert_eq!(json["total_countries"], 4);
    assert_eq!(json["last_refreshed_at"], refreshed["last_refreshed_at"]);
}

#[tokio::test]
async fn test_list_countries_shape() {
    let app = make_test_app().await;
    app.mount_upstream().await;
    app.refresh().await;

    let response = app.get("/countries").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(names(&json), vec!["Nigeria", "Ghana", "France", "Antarctica"]);

    let nigeria = &json[0];
    assert_eq!(nigeria["id"], 1);
    assert_eq!(nigeria["capital"], "Abuja");
    assert_eq!(nigeria["currency_code"], "NGN");
    assert_eq!(nigeria["exchange_rate"], 1600.0);
    assert!(nigeria["estimated_gdp"].as_f64().unwrap() > 0.0);
    assert_eq!(nigeria["flag_url"], "https://flagcdn.com/ng.svg");

    let antarctica = &json[3];
    assert!(antarctica.get("currency_code").is_none());
    assert!(antarctica.get("exchange_rate").is_none());
    assert!(antarctica.get("estimated_gdp").is_none());
}

#[tokio::test]
async fn test_list_countries_filters_and_sort() {
    let app = make_test_app().await;
    app.mount_upstream().await;
    app.refresh().await;

    let json = body_to_json(app.get("/countries?region=africa").await.into_body()).await;
    assert_eq!(names(&json), vec!["Nigeria", "Ghana"]);

    let json = body_to_json(app.get("/countries?currency=eur").await.into_body()).await;
    assert_eq!(names(&json), vec!["France"]);

    let json = body_to_json(app.get("/countries?sort=gdp_desc").await.into_body()).await;
    let gdps: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["estimated_gdp"].as_f64().unwrap_or(0.0))
        .collect();
    assert!(gdps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_get_country_case_insensitive() {
    let app = make_test_app().await;
    app.mount_upstream().await;
    app.refresh().await;

    let response = app.get("/countries/gHaNa").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["name"], "Ghana");
    assert_eq!(json["currency_code"], "GHS");
}

#[tokio::test]
async fn test_get_country_not_found_carries_search_term() {
    let app = make_test_app().await;
    app.mount_upstream().await;
    app.refresh().await;

    let response = app.get("/countries/Atlantis").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Country not found");
    assert_eq!(json["searched_for"], "Atlantis");
}

#[tokio::test]
async fn test_blank_name_is_bad_request() {
    let app = make_test_app().await;

    let response = app.get("/countries/%20%20").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(Request::delete("/countries/%20").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_country() {
    let app = make_test_app().await;
    app.mount_upstream().await;
    app.refresh().await;

    let response = app
        .send(Request::delete("/countries/france").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Country 'France' deleted successfully");

    let response = app
        .send(Request::delete("/countries/france").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_to_json(app.get("/status").await.into_body()).await;
    assert_eq!(json["total_countries"], 3);
}

#[tokio::test]
async fn test_summary_image_lifecycle() {
    let app = make_test_app().await;

    let response = app.get("/countries/image").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"], "Summary image not found");

    app.mount_upstream().await;
    app.refresh().await;

    let response = app.get("/countries/image").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn test_refresh_failure_is_server_error() {
    let app = make_test_app().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.upstream)
        .await;

    let response = app.refresh().await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("unavailable"));
    assert_eq!(json["status"], 500);

    let json = body_to_json(app.get("/status").await.into_body()).await;
    assert_eq!(json["total_countries"], 0);
    assert!(json["last_refreshed_at"].is_null());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = make_test_app().await;
    let response = app.get("/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serves_over_tcp_until_shutdown() {
    let (state, _upstream, _cache) = make_test_state().await;
    let listener = bind(&ServerSettings {
        host: String::from("127.0.0.1"),
        port: 0,
    })
    .await
    .unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(serve_until(listener, state, async {
        let _ = stopped.await;
    }));

    let response = reqwest::get(format!("http://{addr}/status")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["total_countries"], 0);

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();
}
