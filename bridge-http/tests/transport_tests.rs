//! Transport tests against a local mock server

use bridge_http::ReqwestHttpClient;
use bridge_traits::{BridgeError, HttpClient, HttpMethod, HttpRequest, RetryPolicy};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        use_exponential_backoff: true,
    }
}

#[tokio::test]
async fn test_post_sends_headers_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/v1/search"))
        .and(header("Authorization", "Bearer token-1"))
        .and(header("X-Scio-ActAs", "user@example.com"))
        .and(body_json(json!({ "pageSize": 1000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new().unwrap();
    let request = HttpRequest::new(
        HttpMethod::Post,
        format!("{}/rest/api/v1/search", server.uri()),
    )
    .bearer_token("token-1")
    .header("X-Scio-ActAs", "user@example.com")
    .json(&json!({ "pageSize": 1000 }))
    .unwrap();

    let response = client.execute(request).await.unwrap();
    assert!(response.is_success());
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body, json!({ "results": [] }));
}

#[tokio::test]
async fn test_client_error_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/api/v1/createcollection"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "errorCode": "NAME_EXISTS" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new().unwrap();
    let request = HttpRequest::new(
        HttpMethod::Post,
        format!("{}/rest/api/v1/createcollection", server.uri()),
    );

    let response = client.execute(request).await.unwrap();
    assert_eq!(response.status, 422);
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_post_is_not_retried_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new().unwrap();
    let request = HttpRequest::new(HttpMethod::Post, format!("{}/anything", server.uri()));

    let response = client
        .execute_with_retry(request, fast_policy())
        .await
        .unwrap();
    assert_eq!(response.status, 503);
}

#[tokio::test]
async fn test_get_is_retried_until_attempts_exhausted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new().unwrap();
    let request = HttpRequest::new(HttpMethod::Get, format!("{}/health", server.uri()));

    let response = client
        .execute_with_retry(request, fast_policy())
        .await
        .unwrap();
    assert_eq!(response.status, 500);
}

#[tokio::test]
async fn test_request_timeout_maps_to_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new().unwrap();
    let request = HttpRequest::new(HttpMethod::Post, format!("{}/slow", server.uri()))
        .timeout(Duration::from_millis(50));

    let result = client.execute(request).await;
    assert!(matches!(result, Err(BridgeError::Timeout)));
}
