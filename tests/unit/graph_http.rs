//! Unit tests for the retrying Graph HTTP client

use insights_exporter::config::MAX_RETRIES;
use insights_exporter::fetcher::graph_http::GraphHttpClient;
use insights_exporter::fetcher::FetcherError;
use mockito::{Matcher, Server};
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

const RATE_LIMIT_BODY: &str = r#"{"error":{"message":"Application request limit reached","type":"OAuthException","code":4,"fbtrace_id":"A1"}}"#;

fn fast_client(max_retries: u32) -> GraphHttpClient {
    GraphHttpClient::new(Client::new(), Duration::from_millis(1), max_retries)
}

fn account_url(server: &Server) -> Url {
    Url::parse(&format!("{}/v21.0/42?fields=username,name&access_token=tok", server.url())).unwrap()
}

#[tokio::test]
async fn test_rate_limit_exhausts_after_max_retries_plus_one() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(RATE_LIMIT_BODY)
        .expect(MAX_RETRIES as usize + 1)
        .create_async()
        .await;

    let client = fast_client(MAX_RETRIES);
    let result = client.get_json::<serde_json::Value>(&account_url(&server)).await;

    match result {
        Err(FetcherError::RateLimitExhausted { status, attempts }) => {
            assert_eq!(status, 400);
            assert_eq!(attempts, MAX_RETRIES + 1);
        }
        other => panic!("expected RateLimitExhausted, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_succeeds_after_transient_rate_limit() {
    let mut server = Server::new_async().await;
    let throttled = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"code":100,"error_subcode":2446079}}"#)
        .expect(2)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":"42","username":"brand","name":"Brand"}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fast_client(MAX_RETRIES);
    let body: serde_json::Value = client.get_json(&account_url(&server)).await.unwrap();

    assert_eq!(body["username"], "brand");
    throttled.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_backoff_waits_grow_quadratically() {
    let mut server = Server::new_async().await;
    let throttled = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"code":613}}"#)
        .expect(2)
        .create_async()
        .await;
    let ok = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id":"42"}"#)
        .expect(1)
        .create_async()
        .await;

    // Waits of 20ms * 1² and 20ms * 2²
    let client = GraphHttpClient::new(Client::new(), Duration::from_millis(20), MAX_RETRIES);
    let started = Instant::now();
    let body: serde_json::Value = client.get_json(&account_url(&server)).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(body["id"], "42");
    assert!(elapsed >= Duration::from_millis(100), "elapsed {elapsed:?}");
    throttled.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_non_rate_limit_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"message":"Invalid OAuth access token","type":"OAuthException","code":190}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fast_client(MAX_RETRIES);
    let err = client
        .get_json::<serde_json::Value>(&account_url(&server))
        .await
        .unwrap_err();

    match &err {
        FetcherError::Api { status, code, message, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(*code, Some(190));
            assert_eq!(message, "Invalid OAuth access token");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(err.to_string().contains("HTTP 400"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_error_body_fails_on_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .expect(1)
        .create_async()
        .await;

    let client = fast_client(MAX_RETRIES);
    let err = client
        .get_json::<serde_json::Value>(&account_url(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, FetcherError::Api { status: 502, code: None, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_zero_retries_fails_on_first_rate_limit() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error":{"code":17}}"#)
        .expect(1)
        .create_async()
        .await;

    let client = fast_client(0);
    let err = client
        .get_json::<serde_json::Value>(&account_url(&server))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetcherError::RateLimitExhausted { status: 403, attempts: 1 }
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_success_body_that_is_not_json() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v21.0/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = fast_client(MAX_RETRIES);
    let err = client
        .get_json::<serde_json::Value>(&account_url(&server))
        .await
        .unwrap_err();

    assert!(matches!(err, FetcherError::Parse(_)));
}
