//! Unit tests for the HTTP client

use super::*;

use serde::Deserialize;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path};

#[derive(Debug, Deserialize)]
struct Latest {
    version: String,
}

#[test]
fn test_encode_package_name() {
    // Regular package
    assert_eq!(encode_package_name("htmx.org"), "htmx.org");

    // Scoped package
    assert_eq!(encode_package_name("@hotwired/stimulus"), "@hotwired%2fstimulus");
}

#[tokio::test]
async fn test_get_json_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "version": "1.9.10"
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let latest: Latest = client
        .get_json(&format!("{}/latest", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(latest.version, "1.9.10");
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let url = format!("{}/missing", mock_server.uri());
    let result = client.get_text(&url).await;

    match result.unwrap_err() {
        ImportmapError::UpstreamStatus { url: failed, status } => {
            assert_eq!(failed, url);
            assert_eq!(status, 404);
        }
        other => panic!("Expected UpstreamStatus error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undecodable_body_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result: RegistryResult<Latest> = client
        .get_json(&format!("{}/latest", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(ImportmapError::Decode { .. })));
}
