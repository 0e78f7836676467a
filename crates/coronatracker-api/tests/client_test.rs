// Integration tests for `StatsClient` using wiremock.
#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coronatracker_api::{Error, StatsClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, StatsClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = StatsClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

fn summary_body(confirmed: u64, recovered: u64, deaths: u64) -> serde_json::Value {
    json!({
        "confirmed": { "value": confirmed, "detail": "https://example.test/api/confirmed" },
        "recovered": { "value": recovered, "detail": "https://example.test/api/recovered" },
        "deaths": { "value": deaths, "detail": "https://example.test/api/deaths" },
        "lastUpdate": "2020-04-01T12:00:00.000Z"
    })
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_global_summary() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(900, 200, 40)))
        .mount(&server)
        .await;

    let summary = client.global_summary().await.unwrap();

    assert_eq!(summary.confirmed_value(), Some(900));
    assert_eq!(summary.recovered_value(), Some(200));
    assert_eq!(summary.deaths_value(), Some(40));
    assert_eq!(
        summary.last_update.unwrap().to_rfc3339(),
        "2020-04-01T12:00:00+00:00"
    );
}

#[tokio::test]
async fn test_countries() {
    let (server, client) = setup().await;

    let body = json!({
        "countries": [
            { "name": "Poland", "iso2": "PL", "iso3": "POL" },
            { "name": "Germany", "iso2": "DE", "iso3": "DEU" },
            { "name": "Diamond Princess" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let countries = client.countries().await.unwrap();

    let names: Vec<&str> = countries.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Poland", "Germany", "Diamond Princess"]);
    assert_eq!(countries[0].iso3.as_deref(), Some("POL"));
    assert!(countries[2].iso2.is_none());
}

#[tokio::test]
async fn test_country_summary_encodes_name() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/countries/Korea,%20South"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body(10, 5, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let summary = client.country_summary("Korea, South").await.unwrap();
    assert_eq!(summary.confirmed_value(), Some(10));
}

// ── Error handling ──────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/countries/Atlantis"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "error": { "message": "Country Atlantis not found" } })),
        )
        .mount(&server)
        .await;

    let err = client.country_summary("Atlantis").await.unwrap_err();

    match err {
        Error::Server { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("Atlantis"), "unexpected message: {message}");
        }
        other => panic!("expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_error_body_uses_reason() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.global_summary().await.unwrap_err();
    assert!(err.is_server());
    assert!(err.to_string().contains("Service Unavailable"));
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/countries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.countries().await.unwrap_err();

    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>maintenance</html>"),
        other => panic!("expected Deserialization error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_transient() {
    // Nothing listens on the discard port.
    let client = StatsClient::from_reqwest("http://127.0.0.1:9/api", reqwest::Client::new()).unwrap();

    let err = client.global_summary().await.unwrap_err();
    assert!(err.is_transient(), "expected transient error, got {err:?}");
    assert!(!err.is_server());
}
