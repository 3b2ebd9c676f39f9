//! Resilient fetcher over the real reqwest transport

use poly_streak::fetch::{FetchError, FetchPolicy, ReqwestTransport, ResilientFetcher};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(retries: u32, timeout: Duration) -> ResilientFetcher {
    let transport = ReqwestTransport::new("poly-streak-test/1.0").unwrap();
    let policy = FetchPolicy {
        retries,
        backoff: Duration::ZERO,
        timeout,
    };
    ResilientFetcher::new(Arc::new(transport), policy)
}

#[tokio::test]
async fn test_fetch_json_sends_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/markets/slug/p-300"))
        .and(header("accept", "application/json"))
        .and(header("user-agent", "poly-streak-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "winner": "Up" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let url = format!("{}/markets/slug/p-300", mock_server.uri());
    let value = assert_ok!(fetcher(0, Duration::from_secs(2)).fetch_json(&url).await);
    assert_eq!(value["winner"], "Up");
}

#[tokio::test]
async fn test_server_error_is_retried_then_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&mock_server)
        .await;

    let url = format!("{}/flaky", mock_server.uri());
    let err = fetcher(2, Duration::from_secs(2))
        .fetch_json(&url)
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Status { status: 503, url });
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/html", mock_server.uri());
    let err = assert_err!(fetcher(0, Duration::from_secs(2)).fetch_json(&url).await);
    assert_eq!(err.reason(), "decode");
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let url = format!("{}/slow", mock_server.uri());
    let err = fetcher(0, Duration::from_millis(50))
        .fetch_json(&url)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { timeout_ms: 50, .. }));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = fetcher(1, Duration::from_secs(2))
        .fetch_json(&format!("http://127.0.0.1:{}/markets", port))
        .await
        .unwrap_err();
    assert_eq!(err.reason(), "network");
}
