// handlers/lockers.rs - /lockers
//
// Listing and creation are open to anyone. Fetching, updating and deleting
// a single locker need its password, taken from the query string or the
// X-Locker-Password header.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::require_id;
use crate::error::ApiError;
use crate::middleware::{locker_password_from_headers, ApiResponse, ApiResult};
use crate::models::{LockerPatch, LockerSummary, NewLocker};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LockerQuery {
    pub id: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerUpdateQuery {
    pub id: Option<String>,
    pub current_password: Option<String>,
}

fn password_or_header(query_value: Option<String>, headers: &HeaderMap) -> Result<String, ApiError> {
    query_value
        .or_else(|| locker_password_from_headers(headers))
        .ok_or_else(|| ApiError::unauthorized("Locker password required"))
}

/// GET /lockers[?id=&password=] - list without passwords, or open one locker
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LockerQuery>,
) -> Result<Response, ApiError> {
    if query.id.is_none() {
        let lockers = state.lockers.list().await?;
        return Ok(ApiResponse::success(lockers).into_response());
    }

    let id = require_id(query.id.as_deref(), "id")?;
    let password = password_or_header(query.password, &headers)?;
    let locker = state.lockers.verify_and_fetch(id, &password).await?;
    Ok(ApiResponse::success(locker).into_response())
}

/// POST /lockers - create from {name, password}
pub async fn post(
    State(state): State<AppState>,
    body: Result<Json<NewLocker>, JsonRejection>,
) -> ApiResult<LockerSummary> {
    let Json(input) = body?;
    let created = state.lockers.create(input).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /lockers?id=&currentPassword= - rename and/or rotate password
pub async fn put(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LockerUpdateQuery>,
    body: Result<Json<LockerPatch>, JsonRejection>,
) -> ApiResult<LockerSummary> {
    let id = require_id(query.id.as_deref(), "id")?;
    let current = password_or_header(query.current_password, &headers)?;
    let patch = match body {
        Ok(Json(patch)) => patch,
        Err(rejection) => {
            state.lockers.authorize(id, &current).await?;
            return Err(rejection.into());
        }
    };

    let updated = state.lockers.update(id, &current, patch).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /lockers?id=&password= - delete the locker and everything in it
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LockerQuery>,
) -> ApiResult<Value> {
    let id = require_id(query.id.as_deref(), "id")?;
    let password = password_or_header(query.password, &headers)?;

    let removed = state.lockers.delete(id, &password).await?;
    Ok(ApiResponse::success(json!({
        "id": id,
        "deleted": true,
        "resourcesDeleted": removed,
    })))
}
