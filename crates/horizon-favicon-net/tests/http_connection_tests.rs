//! Integration tests for the reqwest-backed connection factory.
//!
//! The factory exposes a blocking API, so each test drives it from
//! `spawn_blocking` while wiremock serves from the test runtime.

use horizon_favicon_net::{ConnectionFactory, HttpClient, NetworkError};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_open_reads_status_type_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/x-icon")
                .set_body_bytes(vec![0u8, 0, 1, 0]),
        )
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/favicon.ico", server.uri())).unwrap();
    let (status, content_type, body) = tokio::task::spawn_blocking(move || {
        let client = HttpClient::new().unwrap();
        let mut connection = client.open(&url).unwrap();
        let status = connection.status();
        let content_type = connection.content_type().map(str::to_string);
        let body = connection.read_body().unwrap();
        (status, content_type, body)
    })
    .await
    .unwrap();

    assert_eq!(status, 200);
    assert_eq!(content_type.as_deref(), Some("image/x-icon"));
    assert_eq!(body.as_ref(), &[0, 0, 1, 0]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_is_a_connection_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/missing.png", server.uri())).unwrap();
    let (status, success) = tokio::task::spawn_blocking(move || {
        let client = HttpClient::new().unwrap();
        let connection = client.open(&url).unwrap();
        (connection.status(), connection.is_success())
    })
    .await
    .unwrap();

    assert_eq!(status, 404);
    assert!(!success);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_body_limit_enforced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 4096]))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/big.png", server.uri())).unwrap();
    let result = tokio::task::spawn_blocking(move || {
        let client = HttpClient::builder().max_body_bytes(1024).build().unwrap();
        let mut connection = client.open(&url).unwrap();
        connection.read_body()
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap_err(), NetworkError::BodyTooLarge { limit: 1024 });
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/slow.png", server.uri())).unwrap();
    let result = tokio::task::spawn_blocking(move || {
        let client = HttpClient::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        client.open(&url).map(|c| c.status())
    })
    .await
    .unwrap();

    assert_eq!(result.unwrap_err(), NetworkError::Timeout);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_url_reports_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/favicon.ico"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", "/static/icon.png"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/static/icon.png"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/favicon.ico", server.uri())).unwrap();
    let (status, served_from) = tokio::task::spawn_blocking(move || {
        let client = HttpClient::new().unwrap();
        let connection = client.open(&url).unwrap();
        (connection.status(), connection.url().to_string())
    })
    .await
    .unwrap();

    assert_eq!(status, 200);
    assert!(served_from.ends_with("/static/icon.png"), "{served_from}");
}
