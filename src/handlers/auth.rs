// handlers/auth.rs - admin session endpoints
//
// POST /auth/login exchanges the admin password for a signed, expiring
// bearer token. GET /auth/verify reports whether the presented credential
// currently grants admin access.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AuthError, SessionToken};
use crate::error::ApiError;
use crate::middleware::{admin_credential_from_headers, ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionToken> {
    let Json(request) = body?;
    if request.password.is_empty() {
        return Err(ApiError::validation_error("Password is required", None));
    }

    match state.admin.issue_session(&request.password) {
        Ok(session) => {
            tracing::info!("Issued admin session");
            Ok(ApiResponse::success(session))
        }
        Err(AuthError::SessionsDisabled) => Err(ApiError::service_unavailable("Admin sessions are not configured")),
        Err(e) => {
            tracing::warn!("Admin login rejected: {}", e);
            Err(e.into())
        }
    }
}

/// GET /auth/verify
pub async fn verify(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Value> {
    let credential = admin_credential_from_headers(&headers);
    let authenticated = state.admin.verify(credential.as_ref()).is_ok();
    Ok(ApiResponse::success(json!({ "authenticated": authenticated })))
}
