use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use statusd::auth::Authenticator;
use statusd::rest::create_router;
use statusd::store::StatusStore;

const API_KEY: &str = "test-key-123";

async fn test_app() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}/status.db?mode=rwc", dir.path().display());
    let store = StatusStore::connect(&url).await.unwrap();
    let auth = Arc::new(Authenticator::new(&[API_KEY.to_string()]));
    (create_router(store, auth), dir)
}

fn post_status(payload: &Value, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/status")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn get_request(uri: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = key {
        builder = builder.header("X-API-Key", key);
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_status() -> Value {
    json!({
        "device_id": "s1",
        "timestamp": "2025-06-19T10:00:00Z",
        "battery_level": 85,
        "rssi": -55,
        "online": true
    })
}

#[tokio::test]
async fn test_post_then_get_then_summary() {
    let (app, _dir) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_status(&sample_status(), Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Status updated successfully" })
    );

    let response = app
        .clone()
        .oneshot(get_request("/status/s1", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // Full view, caller fields verbatim, recorded_at never exposed.
    assert_eq!(body_json(response).await, sample_status());

    let response = app
        .oneshot(get_request("/status/summary", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "devices": [{
                "device_id": "s1",
                "battery_level": 85,
                "online": true,
                "last_update": "2025-06-19T10:00:00Z"
            }]
        })
    );
}

#[tokio::test]
async fn test_last_write_wins() {
    let (app, _dir) = test_app().await;

    app.clone()
        .oneshot(post_status(&sample_status(), Some(API_KEY)))
        .await
        .unwrap();

    let updated = json!({
        "device_id": "s1",
        "timestamp": "2025-06-19T12:00:00+00:00",
        "battery_level": 40,
        "rssi": -70,
        "online": false
    });
    app.clone()
        .oneshot(post_status(&updated, Some(API_KEY)))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/status/s1", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(body_json(response).await, updated);
}

#[tokio::test]
async fn test_summary_sorted_for_any_insertion_order() {
    let (app, _dir) = test_app().await;

    for id in ["charlie", "alpha", "bravo"] {
        let mut payload = sample_status();
        payload["device_id"] = json!(id);
        let response = app
            .clone()
            .oneshot(post_status(&payload, Some(API_KEY)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .oneshot(get_request("/status/summary", Some(API_KEY)))
        .await
        .unwrap();
    let body = body_json(response).await;
    let ids: Vec<&str> = body["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["device_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["alpha", "bravo", "charlie"]);
}

#[tokio::test]
async fn test_summary_empty_store() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(get_request("/status/summary", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "devices": [] }));
}

#[tokio::test]
async fn test_missing_api_key_is_401() {
    let (app, _dir) = test_app().await;

    for request in [
        post_status(&sample_status(), None),
        get_request("/status/s1", None),
        get_request("/status/summary", None),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Missing API key header (X-API-Key)" })
        );
    }
}

#[tokio::test]
async fn test_invalid_api_key_is_401() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(post_status(&sample_status(), Some("invalid-key-999")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid API key" }));
}

#[tokio::test]
async fn test_undecodable_api_key_is_invalid_not_missing() {
    let (app, _dir) = test_app().await;

    // Bytes in the obs-text range are legal in a header value but are not
    // visible ASCII, so the value cannot be read as a string.
    let request = Request::builder()
        .method("GET")
        .uri("/status/s1")
        .header(
            "X-API-Key",
            axum::http::HeaderValue::from_bytes(b"\xFF-key").unwrap(),
        )
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, json!({ "error": "Invalid API key" }));
}

#[tokio::test]
async fn test_health_requires_no_auth() {
    let (app, _dir) = test_app().await;

    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "status": "healthy", "message": "API is running" })
    );
}

#[tokio::test]
async fn test_unknown_device_is_404() {
    let (app, _dir) = test_app().await;

    let response = app
        .oneshot(get_request("/status/nonexistent-device", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "Device not found" }));
}

#[tokio::test]
async fn test_validation_errors_are_400() {
    let (app, _dir) = test_app().await;

    let mut out_of_range = sample_status();
    out_of_range["battery_level"] = json!(101);
    let response = app
        .clone()
        .oneshot(post_status(&out_of_range, Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "battery_level must be an integer between 0 and 100" })
    );

    let mut missing_field = sample_status();
    missing_field.as_object_mut().unwrap().remove("online");
    let response = app
        .clone()
        .oneshot(post_status(&missing_field, Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Missing required field: online" })
    );

    let mut bad_timestamp = sample_status();
    bad_timestamp["timestamp"] = json!("invalid-timestamp");
    let response = app
        .clone()
        .oneshot(post_status(&bad_timestamp, Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "timestamp must be in ISO 8601 format" })
    );
}

#[tokio::test]
async fn test_non_json_body_is_400() {
    let (app, _dir) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/status")
        .header("content-type", "application/json")
        .header("X-API-Key", API_KEY)
        .body(Body::from("not json at all"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "No JSON data provided" })
    );
}

#[tokio::test]
async fn test_rejected_payload_is_not_stored() {
    let (app, _dir) = test_app().await;

    let mut bad = sample_status();
    bad["device_id"] = json!("reject-me");
    bad["battery_level"] = json!(-1);
    app.clone()
        .oneshot(post_status(&bad, Some(API_KEY)))
        .await
        .unwrap();

    let response = app
        .oneshot(get_request("/status/reject-me", Some(API_KEY)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
