//! Sandbox handlers: collection CRUD, bearer check and health.

use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

use super::{SandboxError, SandboxState};
use crate::domain::{RecordId, Resource};

/// Health check response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    version: &'static str,
}

/// `GET /health`: Sandbox liveness. Never requires a token.
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// `GET /{resource}`: Whole collection as `{ "data": [...], "total": n }`.
///
/// # Errors
///
/// Returns [`SandboxError::UnknownResource`] for an unknown path.
pub async fn list_records(
    State(state): State<SandboxState>,
    Path(resource): Path<String>,
) -> Result<impl IntoResponse, SandboxError> {
    let resource = parse_resource(&resource)?;
    let data = state.list(resource).await;
    let total = data.len();
    Ok(Json(json!({ "data": data, "total": total })))
}

/// `POST /{resource}`: Store a new record; answers `201` with it.
///
/// # Errors
///
/// Returns [`SandboxError::UnknownResource`] or
/// [`SandboxError::InvalidRequest`].
pub async fn create_record(
    State(state): State<SandboxState>,
    Path(resource): Path<String>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, SandboxError> {
    let resource = parse_resource(&resource)?;
    let row = state.insert(resource, body).await?;
    tracing::debug!(%resource, id = ?row.get("id"), "sandbox record created");
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /{resource}/{id}`: One record.
///
/// # Errors
///
/// Returns [`SandboxError::UnknownResource`] or
/// [`SandboxError::RecordNotFound`].
pub async fn get_record(
    State(state): State<SandboxState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, SandboxError> {
    let resource = parse_resource(&resource)?;
    Ok(Json(state.get(resource, &RecordId::new(id)).await?))
}

/// `PUT /{resource}/{id}`: Replace a record.
///
/// # Errors
///
/// Returns [`SandboxError::UnknownResource`],
/// [`SandboxError::InvalidRequest`] or [`SandboxError::RecordNotFound`].
pub async fn replace_record(
    State(state): State<SandboxState>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, SandboxError> {
    let resource = parse_resource(&resource)?;
    Ok(Json(state.replace(resource, &RecordId::new(id), body).await?))
}

/// `PATCH /{resource}/{id}`: Merge-patch a record.
///
/// # Errors
///
/// Returns [`SandboxError::UnknownResource`],
/// [`SandboxError::InvalidRequest`] or [`SandboxError::RecordNotFound`].
pub async fn patch_record(
    State(state): State<SandboxState>,
    Path((resource, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, SandboxError> {
    let resource = parse_resource(&resource)?;
    Ok(Json(state.patch(resource, &RecordId::new(id), body).await?))
}

/// `DELETE /{resource}/{id}`: Remove a record; answers `204`.
///
/// # Errors
///
/// Returns [`SandboxError::UnknownResource`] or
/// [`SandboxError::RecordNotFound`].
pub async fn delete_record(
    State(state): State<SandboxState>,
    Path((resource, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, SandboxError> {
    let resource = parse_resource(&resource)?;
    state.remove(resource, &RecordId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Rejects requests without the configured bearer token.
///
/// Passes everything through when the sandbox has no token.
///
/// # Errors
///
/// Returns [`SandboxError::Unauthorized`] on a missing or wrong token.
pub async fn require_token(
    State(state): State<SandboxState>,
    request: Request,
    next: Next,
) -> Result<Response, SandboxError> {
    if let Some(expected) = state.token() {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        if presented != Some(expected) {
            tracing::warn!(path = %request.uri().path(), "rejected request without valid token");
            return Err(SandboxError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}

/// Collection routes, relative to the API root.
pub fn routes() -> Router<SandboxState> {
    Router::new()
        .route("/{resource}", get(list_records).post(create_record))
        .route(
            "/{resource}/{id}",
            get(get_record)
                .put(replace_record)
                .patch(patch_record)
                .delete(delete_record),
        )
}

fn parse_resource(raw: &str) -> Result<Resource, SandboxError> {
    Resource::from_path(raw).ok_or_else(|| SandboxError::UnknownResource(raw.to_string()))
}
