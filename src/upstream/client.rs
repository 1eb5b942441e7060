//! Downstream storage service client.
//!
//! # Responsibilities
//! - Issue exactly one HTTP call per gateway operation
//! - Bound every call with the configured timeout
//! - Sort every failure into an [`UpstreamError`] category
//!
//! # Design Decisions
//! - No retries: create/delete are not idempotent and callers see every failure
//! - Redirects are not followed; a 3xx is a non-success status
//! - All operations share one call-wrapping function

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use reqwest::{redirect, Client, RequestBuilder};
use serde_json::Value;
use tokio::time::timeout;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::upstream::error::UpstreamError;
use crate::users::UserRecord;

/// The four downstream operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    GetUser,
    DeleteUser,
    ListUsers,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::CreateUser => "create_user",
            Operation::GetUser => "get_user",
            Operation::DeleteUser => "delete_user",
            Operation::ListUsers => "list_users",
        }
    }
}

/// A successful downstream answer, passed through verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// JSON body; `Value::Null` when the downstream sent no body.
    pub body: Value,
}

/// Client for the downstream user storage service.
///
/// Cheap to clone; the connection pool is shared between clones.
#[derive(Debug, Clone)]
pub struct UpstreamProxy {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl UpstreamProxy {
    /// Create a proxy for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .no_proxy()
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, reqwest::Error> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Forward a validated record to `POST /add_user`.
    pub async fn create_user(&self, record: &UserRecord) -> Result<UpstreamResponse, UpstreamError> {
        let request = self.client.post(self.url("/add_user")).json(record);
        self.call(Operation::CreateUser, request).await
    }

    /// `GET /get_user/{id}`. A downstream 404 stays an HTTP error.
    pub async fn get_user(&self, user_id: i64) -> Result<UpstreamResponse, UpstreamError> {
        let request = self.client.get(self.url(&format!("/get_user/{}", user_id)));
        self.call(Operation::GetUser, request).await
    }

    /// `DELETE /delete_user/{id}`.
    pub async fn delete_user(&self, user_id: i64) -> Result<UpstreamResponse, UpstreamError> {
        let request = self.client.delete(self.url(&format!("/delete_user/{}", user_id)));
        self.call(Operation::DeleteUser, request).await
    }

    /// `GET /get_all_users`.
    pub async fn list_users(&self) -> Result<UpstreamResponse, UpstreamError> {
        let request = self.client.get(self.url("/get_all_users"));
        self.call(Operation::ListUsers, request).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Single attempt, bounded by the timeout, outcome recorded.
    async fn call(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let start = Instant::now();

        let result = match timeout(self.timeout, execute(request)).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Connection(format!(
                "no response within {} ms",
                self.timeout.as_millis()
            ))),
        };

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.kind().as_str(),
        };
        metrics::record_upstream_call(operation.as_str(), outcome, start);

        match &result {
            Ok(response) => tracing::debug!(
                operation = operation.as_str(),
                status = %response.status,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Downstream call succeeded"
            ),
            Err(e) => tracing::error!(
                operation = operation.as_str(),
                kind = e.kind().as_str(),
                error = %e,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Downstream call failed"
            ),
        }

        result
    }
}

async fn execute(request: RequestBuilder) -> Result<UpstreamResponse, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| UpstreamError::from_transport(&e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Http { status });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::from_transport(&e))?;

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Unexpected(format!("response body is not JSON: {}", e)))?
    };

    Ok(UpstreamResponse { status, body })
}
