//! Exercises `HatchClient` against a local stand-in for the Hatch API.

use std::net::SocketAddr;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use enrich_hatch::{HatchApiError, HatchClient, HatchConfig};

const API_KEY: &str = "test-key";

/// Mimics `POST /v1/findPhone`, answering based on the profile slug.
async fn find_phone(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("x-api-key").and_then(|v| v.to_str().ok()) != Some(API_KEY) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad key" })));
    }

    let url = body["linkedinUrl"].as_str().unwrap_or_default();
    match url.rsplit('/').next().unwrap_or_default() {
        "alice" => (StatusCode::OK, Json(json!({ "phone": "+919812345678" }))),
        "bob" => (StatusCode::OK, Json(json!({ "phone": ["+918100000000", "+917000000000"] }))),
        "carol" => (StatusCode::OK, Json(json!({ "phone": null }))),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "upstream" }))),
        _ => (StatusCode::OK, Json(json!({}))),
    }
}

async fn spawn_mock() -> SocketAddr {
    let app = Router::new().route("/v1/findPhone", post(find_phone));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr, api_key: &str) -> HatchClient {
    let config = HatchConfig::new(api_key).with_api_url(format!("http://{addr}"));
    HatchClient::new(config).unwrap()
}

#[tokio::test]
async fn string_phone_is_returned_raw() {
    let client = client_for(spawn_mock().await, API_KEY);
    let phone = client.find_phone("https://linkedin.com/in/alice").await.unwrap();
    assert_eq!(phone, Some(json!("+919812345678")));
}

#[tokio::test]
async fn array_phone_is_returned_raw() {
    let client = client_for(spawn_mock().await, API_KEY);
    let phone = client.find_phone("https://linkedin.com/in/bob").await.unwrap();
    assert_eq!(phone, Some(json!(["+918100000000", "+917000000000"])));
}

#[tokio::test]
async fn null_or_missing_phone_is_none() {
    let client = client_for(spawn_mock().await, API_KEY);
    assert_eq!(client.find_phone("https://linkedin.com/in/carol").await.unwrap(), None);
    assert_eq!(client.find_phone("https://linkedin.com/in/dave").await.unwrap(), None);
}

#[tokio::test]
async fn non_success_status_is_api_error() {
    let client = client_for(spawn_mock().await, API_KEY);
    let err = client.find_phone("https://linkedin.com/in/boom").await.unwrap_err();
    match err {
        HatchApiError::ApiError { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn wrong_api_key_is_rejected() {
    let client = client_for(spawn_mock().await, "wrong");
    let err = client.find_phone("https://linkedin.com/in/alice").await.unwrap_err();
    assert!(matches!(err, HatchApiError::ApiError { status: 401, .. }));
}

#[tokio::test]
async fn unreachable_host_is_request_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr, API_KEY);
    let err = client.find_phone("https://linkedin.com/in/alice").await.unwrap_err();
    assert!(matches!(err, HatchApiError::Request(_)));
}
