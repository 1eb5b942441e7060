//! Route handlers.
//!
//! Each handler validates what it received, makes at most one downstream
//! call, and hands the outcome to [`respond`], which also records metrics.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::GatewayError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::UpstreamResponse;
use crate::users::{validate_user, NewUser, ValidationError};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

/// `POST /add_user`
pub async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let result = create_user(&state, payload).await;
    respond("add_user", start, result)
}

/// `GET /get_user/{user_id}`
pub async fn get_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let result = match parse_user_id(user_id) {
        Ok(user_id) => state.proxy.get_user(user_id).await.map_err(GatewayError::from),
        Err(e) => Err(e),
    };
    respond("get_user", start, result)
}

/// `DELETE /delete_user/{user_id}`
pub async fn delete_user(
    State(state): State<AppState>,
    user_id: Result<Path<i64>, PathRejection>,
) -> Response {
    let start = Instant::now();
    let result = match parse_user_id(user_id) {
        Ok(user_id) => {
            tracing::info!(user_id, "Deleting user");
            state.proxy.delete_user(user_id).await.map_err(GatewayError::from)
        }
        Err(e) => Err(e),
    };
    respond("delete_user", start, result)
}

/// `GET /get_all_users`
pub async fn get_all_users(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let result = state.proxy.list_users().await.map_err(GatewayError::from);
    respond("get_all_users", start, result)
}

/// `GET /health`
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    GatewayError::NotFound(uri.path().to_string()).into_response()
}

/// Fallback for known routes called with the wrong method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> Response {
    tracing::debug!(%method, path = %uri.path(), "Method not allowed");
    GatewayError::MethodNotAllowed {
        method,
        path: uri.path().to_string(),
    }
    .into_response()
}

async fn create_user(
    state: &AppState,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<UpstreamResponse, GatewayError> {
    let Json(raw) = payload.map_err(|rejection| body_rejection(rejection, state.max_body_size))?;
    let record = validate_user(&raw).inspect_err(|e| {
        tracing::warn!(field = e.field, "User rejected by validation");
    })?;

    tracing::info!(username = record.username(), "Forwarding new user");
    Ok(state.proxy.create_user(&record).await?)
}

/// Pass a downstream success through verbatim, or render the error envelope.
fn respond(
    operation: &'static str,
    start: Instant,
    result: Result<UpstreamResponse, GatewayError>,
) -> Response {
    let response = match result {
        Ok(upstream) => (upstream.status, Json(upstream.body)).into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_request(operation, response.status().as_u16(), start);
    response
}

fn parse_user_id(user_id: Result<Path<i64>, PathRejection>) -> Result<i64, GatewayError> {
    user_id.map(|Path(id)| id).map_err(|rejection| {
        tracing::warn!(status = %rejection.status(), "Rejected user id");
        GatewayError::from(ValidationError::new(
            "user_id",
            "user_id must be an integer",
        ))
    })
}

/// Body problems are reported as validation errors. serde's message is not
/// forwarded because it can quote field values.
fn body_rejection(rejection: JsonRejection, max_body_size: usize) -> GatewayError {
    tracing::warn!(status = %rejection.status(), "Rejected request body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return GatewayError::PayloadTooLarge {
            limit: max_body_size,
        };
    }
    let reason = match rejection {
        JsonRejection::JsonDataError(_) => "request body does not match the user schema",
        JsonRejection::JsonSyntaxError(_) => "request body is not valid JSON",
        JsonRejection::MissingJsonContentType(_) => {
            "expected request with `Content-Type: application/json`"
        }
        _ => "request body could not be read",
    };
    GatewayError::from(ValidationError::new("body", reason))
}
