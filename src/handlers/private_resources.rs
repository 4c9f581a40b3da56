// handlers/private_resources.rs - /private-resources
//
// Every method needs ?lockerId= and the X-Locker-Password header. The
// password is checked before the body or the record id are looked at.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::{body_or_null, require_id};
use crate::error::ApiError;
use crate::middleware::{locker_password_from_headers, ApiResponse, ApiResult};
use crate::models::{PrivateResource, ResourceFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PrivateQuery {
    #[serde(rename = "lockerId")]
    pub locker_id: Option<String>,
    pub id: Option<String>,
    #[serde(flatten)]
    pub filter: ResourceFilter,
}

fn locker_credentials(query: &PrivateQuery, headers: &HeaderMap) -> Result<(Uuid, String), ApiError> {
    let locker_id = require_id(query.locker_id.as_deref(), "lockerId")?;
    let password =
        locker_password_from_headers(headers).ok_or_else(|| ApiError::unauthorized("Locker password required"))?;
    Ok((locker_id, password))
}

/// Parse `?id=`. A bad id is only reported to a caller holding the right
/// password; everyone else gets the credential failure.
async fn checked_id(state: &AppState, query: &PrivateQuery, locker_id: Uuid, password: &str) -> Result<Uuid, ApiError> {
    match require_id(query.id.as_deref(), "id") {
        Ok(id) => Ok(id),
        Err(e) => {
            state.lockers.authorize(locker_id, password).await?;
            Err(e)
        }
    }
}

/// GET /private-resources?lockerId=[&id=]
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PrivateQuery>,
) -> Result<Response, ApiError> {
    let (locker_id, password) = locker_credentials(&query, &headers)?;

    if query.id.is_some() {
        let id = checked_id(&state, &query, locker_id, &password).await?;
        let doc = state.private_resources.get(locker_id, &password, id).await?;
        return Ok(ApiResponse::success(doc).into_response());
    }

    let docs = state.private_resources.list(locker_id, &password, &query.filter).await?;
    Ok(ApiResponse::success(docs).into_response())
}

/// POST /private-resources?lockerId=
pub async fn post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PrivateQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PrivateResource> {
    let (locker_id, password) = locker_credentials(&query, &headers)?;
    let doc = state
        .private_resources
        .create(locker_id, &password, body_or_null(body))
        .await?;
    Ok(ApiResponse::created(doc))
}

/// PUT /private-resources?lockerId=&id=
pub async fn put(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PrivateQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PrivateResource> {
    let (locker_id, password) = locker_credentials(&query, &headers)?;
    let id = checked_id(&state, &query, locker_id, &password).await?;

    let doc = state
        .private_resources
        .update(locker_id, &password, id, body_or_null(body))
        .await?;
    Ok(ApiResponse::success(doc))
}

/// DELETE /private-resources?lockerId=&id=
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PrivateQuery>,
) -> ApiResult<Value> {
    let (locker_id, password) = locker_credentials(&query, &headers)?;
    let id = checked_id(&state, &query, locker_id, &password).await?;

    state.private_resources.delete(locker_id, &password, id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
