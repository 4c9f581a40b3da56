mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use common::{data, send, test_app, ADMIN_PASSWORD};
use study_locker_api::auth::AdminAuthority;
use study_locker_api::config::AppConfig;
use study_locker_api::store::MemoryStore;
use study_locker_api::{app, AppState};

#[tokio::test]
async fn login_issues_a_verifiable_token() {
    let app = test_app();

    let (status, login) = send(&app, Method::POST, "/auth/login", &[], Some(json!({ "password": ADMIN_PASSWORD }))).await;
    assert_eq!(status, StatusCode::OK);
    let session = data(&login);
    assert!(session["expiresIn"].as_i64().unwrap() > 0);
    let bearer = format!("Bearer {}", session["token"].as_str().unwrap());

    let (status, verified) = send(&app, Method::GET, "/auth/verify", &[("authorization", bearer.as_str())], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&verified)["authenticated"], true);
}

#[tokio::test]
async fn login_rejects_bad_passwords() {
    let app = test_app();

    let (status, err) = send(&app, Method::POST, "/auth/login", &[], Some(json!({ "password": "guess" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::POST, "/auth/login", &[], Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_reports_each_credential() {
    let app = test_app();

    let (_, anonymous) = send(&app, Method::GET, "/auth/verify", &[], None).await;
    assert_eq!(data(&anonymous)["authenticated"], false);

    let (_, password) = send(&app, Method::GET, "/auth/verify", &[("x-admin-password", ADMIN_PASSWORD)], None).await;
    assert_eq!(data(&password)["authenticated"], true);

    let (_, wrong) = send(&app, Method::GET, "/auth/verify", &[("x-admin-password", "nope")], None).await;
    assert_eq!(data(&wrong)["authenticated"], false);
}

#[tokio::test]
async fn root_and_health() {
    let app = test_app();

    let (status, root) = send(&app, Method::GET, "/", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&root)["name"], "Study Locker API");

    let (status, health) = send(&app, Method::GET, "/health", &[], None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(data(&health)["status"], "ok");
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/nope", &[], None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn default_config_has_no_session_key() {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config.security.admin_password = Some(ADMIN_PASSWORD.to_string());
    let app = app(
        AppState::new(Arc::new(MemoryStore::new()), AdminAuthority::from_config(&config.security)),
        &config,
    );

    let (status, err) = send(&app, Method::POST, "/auth/login", &[], Some(json!({ "password": ADMIN_PASSWORD }))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(err["code"], "SERVICE_UNAVAILABLE");

    let exp = chrono::Utc::now().timestamp() + 3600;
    let claims = json!({ "sub": "admin", "iss": "study-locker-api", "exp": exp, "iat": exp - 3600 });
    let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"development-session-secret")).unwrap();
    let bearer = format!("Bearer {}", forged);

    let (status, _) = send(
        &app,
        Method::POST,
        "/resources",
        &[("authorization", bearer.as_str())],
        Some(json!({ "title": "Forged", "category": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, list) = send(&app, Method::GET, "/resources", &[], None).await;
    assert!(data(&list).as_array().unwrap().is_empty());

    // The admin password header still works
    let (status, _) = send(
        &app,
        Method::POST,
        "/resources",
        &[("x-admin-password", ADMIN_PASSWORD)],
        Some(json!({ "title": "Real", "category": "rust" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}
