// handlers/resources.rs - /resources
//
// GET is public. POST/PUT/DELETE take the admin credential from
// X-Admin-Password or a bearer session token.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{body_or_null, require_id};
use crate::error::ApiError;
use crate::middleware::{admin_credential_from_headers, ApiResponse, ApiResult};
use crate::models::{Resource, ResourceFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub id: Option<String>,
    #[serde(flatten)]
    pub filter: ResourceFilter,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// GET /resources[?id=] - single resource or the full list, newest first
pub async fn get(State(state): State<AppState>, Query(query): Query<ResourceQuery>) -> Result<Response, ApiError> {
    if query.id.is_some() {
        let id = require_id(query.id.as_deref(), "id")?;
        let resource = state.resources.get(id).await?;
        return Ok(ApiResponse::success(resource).into_response());
    }

    let resources = state.resources.list(&query.filter).await?;
    Ok(ApiResponse::success(resources).into_response())
}

/// POST /resources - create (admin)
pub async fn post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Resource> {
    let credential = admin_credential_from_headers(&headers);
    let created = state.resources.create(credential.as_ref(), body_or_null(body)).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /resources?id= - merge a partial update (admin)
pub async fn put(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Resource> {
    let credential = admin_credential_from_headers(&headers);
    // Credential before id parsing so an anonymous caller always sees 401
    state.admin.verify(credential.as_ref())?;

    let id = require_id(query.id.as_deref(), "id")?;
    let updated = state.resources.update(credential.as_ref(), id, body_or_null(body)).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /resources?id= - remove (admin)
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IdQuery>,
) -> ApiResult<Value> {
    let credential = admin_credential_from_headers(&headers);
    state.admin.verify(credential.as_ref())?;

    let id = require_id(query.id.as_deref(), "id")?;
    state.resources.delete(credential.as_ref(), id).await?;
    Ok(ApiResponse::success(json!({ "id": id, "deleted": true })))
}
