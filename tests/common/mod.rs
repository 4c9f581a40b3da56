#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use study_locker_api::auth::AdminAuthority;
use study_locker_api::config::AppConfig;
use study_locker_api::store::MemoryStore;
use study_locker_api::{app, AppState};

pub const ADMIN_PASSWORD: &str = "admin-pw";

/// Fresh router over an empty in-memory store.
pub fn test_app() -> Router {
    let admin = AdminAuthority::new(Some(ADMIN_PASSWORD.to_string()), Some("test-secret".to_string()), 1);
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    app(AppState::new(Arc::new(MemoryStore::new()), admin), &config)
}

/// Send one request and decode the JSON envelope.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Send a raw (possibly malformed) JSON body.
pub async fn send_raw(app: &Router, method: Method, uri: &str, headers: &[(&str, &str)], raw: &str) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = app
        .clone()
        .oneshot(builder.body(Body::from(raw.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

pub fn admin() -> [(&'static str, &'static str); 1] {
    [("x-admin-password", ADMIN_PASSWORD)]
}

pub fn data(body: &Value) -> &Value {
    assert_eq!(body["success"], true, "expected success envelope, got {}", body);
    &body["data"]
}

pub fn id_of(body: &Value) -> String {
    data(body)["id"].as_str().expect("id").to_string()
}

/// Create a locker and return its id.
pub async fn create_locker(app: &Router, name: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/lockers",
        &[],
        Some(serde_json::json!({ "name": name, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    id_of(&body)
}
