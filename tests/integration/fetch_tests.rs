//! Direct transport against a mock server

use crate::common::{mock_config, BASE_PATH, READINGS_PAGE};
use lecturas::config::DEFAULT_USER_AGENT;
use lecturas::fetch::{DirectTransport, Transport};
use lecturas::ReadingsError;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn page_path() -> String {
    format!("{}/2025/12/04.html", BASE_PATH)
}

#[tokio::test]
async fn test_direct_fetch_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(page_path()))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(READINGS_PAGE)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server);
    let transport = DirectTransport::new(&config.source, &config.fetch).unwrap();

    let url = format!("{}{}", mock_server.uri(), page_path());
    let body = transport.fetch(&url).await.expect("fetch failed");
    assert!(body.contains("Evangelio del Día"));
}

#[tokio::test]
async fn test_direct_fetch_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = mock_config(&mock_server);
    let transport = DirectTransport::new(&config.source, &config.fetch).unwrap();

    let url = format!("{}{}", mock_server.uri(), page_path());
    let err = transport.fetch(&url).await.unwrap_err();
    assert!(matches!(err, ReadingsError::FetchFailed { status: 500, .. }));
    assert!(err.to_string().contains("HTTP 500"));
}

#[tokio::test]
async fn test_direct_fetch_not_found() {
    let mock_server = MockServer::start().await;

    let config = mock_config(&mock_server);
    let transport = DirectTransport::new(&config.source, &config.fetch).unwrap();

    // Nothing mounted: wiremock answers 404
    let url = format!("{}{}", mock_server.uri(), page_path());
    let err = transport.fetch(&url).await.unwrap_err();
    assert!(matches!(err, ReadingsError::FetchFailed { status: 404, .. }));
}

#[tokio::test]
async fn test_direct_fetch_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(READINGS_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = mock_config(&mock_server);
    config.fetch.request_timeout_secs = 1;
    let transport = DirectTransport::new(&config.source, &config.fetch).unwrap();

    let url = format!("{}{}", mock_server.uri(), page_path());
    let err = transport.fetch(&url).await.unwrap_err();
    assert!(matches!(err, ReadingsError::FetchTimeout { timeout_secs: 1, .. }));
}
