//! Integration tests for the web endpoint

mod common;

use async_trait::async_trait;
use common::test_engine;
use std::sync::Arc;
use url::Url;
use webrecon::error::{Result, WebreconError};
use webrecon::http::HttpClient;
use webrecon::models::ReconReport;
use webrecon::scanner::recon::Recon;
use webrecon::scanner::ScanEngine;
use webrecon::server::{serve, AppState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts the endpoint on an ephemeral port and returns its base URL
async fn spawn_server(engine: ScanEngine) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = Arc::new(AppState { engine });
    tokio::spawn(async move {
        let _ = serve(listener, state).await;
    });
    format!("http://{addr}")
}

struct BrokenRecon;

#[async_trait]
impl Recon for BrokenRecon {
    async fn perform(&self, _client: &HttpClient, _target: &Url) -> Result<ReconReport> {
        Err(WebreconError::ConfigError("resolver unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_index_serves_form() {
    let base = spawn_server(test_engine(5, &[])).await;

    let response = reqwest::get(format!("{base}/")).await.expect("request");
    assert_eq!(response.status(), 200);
    let body = response.text().await.expect("body");
    assert!(body.contains(r#"name="target_url""#));
    assert!(body.contains(r#"action="/scan""#));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let base = spawn_server(test_engine(5, &[])).await;

    let response = reqwest::get(format!("{base}/nowhere")).await.expect("request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_invalid_url_then_rate_limited() {
    let base = spawn_server(test_engine(1, &[])).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{base}/scan"))
        .form(&[("target_url", "javascript:alert(1)")])
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["error"], "Invalid URL provided");

    let response = client
        .post(format!("{base}/scan"))
        .form(&[("target_url", "https://example.com")])
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 429);
    assert_eq!(
        response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok()),
        Some("60")
    );
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(
        body["error"],
        "Rate limit exceeded. Please wait before requesting another scan."
    );
}

#[tokio::test]
async fn test_missing_target_is_400() {
    let base = spawn_server(test_engine(5, &[])).await;

    let response = reqwest::get(format!("{base}/scan")).await.expect("request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_scan_returns_json_and_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><meta name="generator" content="Hugo 0.120"></head></html>"#,
            "text/html",
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let base = spawn_server(test_engine(5, &["admin"])).await;
    let client = reqwest::Client::new();
    let target = format!("{}/", mock_server.uri());

    let response = client
        .get(format!("{base}/scan"))
        .query(&[("target_url", target.as_str())])
        .header("Accept", "application/json")
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["target"], target);
    assert_eq!(body["recon"]["technologies"][0], "Hugo 0.120");
    assert_eq!(
        body["directories"]["discovered"][0]["url"],
        format!("{}/admin", mock_server.uri())
    );

    let response = client
        .post(format!("{base}/scan"))
        .form(&[("target_url", target.as_str())])
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    let html = response.text().await.expect("body");
    assert!(html.contains("Scan Results"));
    assert!(html.contains("Hugo 0.120"));
}

#[tokio::test]
async fn test_phase_failure_is_500() {
    let engine = test_engine(5, &["admin"]).with_recon(Arc::new(BrokenRecon));
    let base = spawn_server(engine).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/scan"))
        .form(&[("target_url", "http://127.0.0.1:9/")])
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.expect("json");
    assert_eq!(body["error"], "Scan failed during the recon phase");
    assert!(!body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("resolver unavailable"));
}
