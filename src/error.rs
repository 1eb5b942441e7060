//! Client-facing error taxonomy.
//!
//! Every failure the gateway reports leaves through [`GatewayError`] as
//! `{"detail": {"error": <message>, "type": <kind>}}`.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::metrics;
use crate::upstream::UpstreamError;
use crate::users::ValidationError;

/// The closed set of error categories callers can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    ConnectionError,
    HttpError,
    UnexpectedError,
    NotFound,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::ConnectionError => "connection_error",
            ErrorKind::HttpError => "http_error",
            ErrorKind::UnexpectedError => "unexpected_error",
            ErrorKind::NotFound => "not_found",
        }
    }
}

/// Message and category of a reported error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "error")]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ErrorKind,
}

/// Wire wrapper around [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorEnvelope,
}

/// Anything a gateway handler can fail with.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("no route for {0}")]
    NotFound(String),

    /// The path exists but not for this method.
    #[error("{method} not allowed for {path}")]
    MethodNotAllowed { method: Method, path: String },

    /// Request body exceeded `security.max_body_size`.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::Upstream(e) => e.status(),
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Validation(_) | GatewayError::PayloadTooLarge { .. } => {
                ErrorKind::ValidationError
            }
            GatewayError::Upstream(e) => e.kind(),
            GatewayError::NotFound(_) | GatewayError::MethodNotAllowed { .. } => {
                ErrorKind::NotFound
            }
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let message = match self {
            GatewayError::Validation(e) => e.reason.clone(),
            GatewayError::Upstream(e) => e.client_message(),
            GatewayError::NotFound(path) => format!("No route for {}", path),
            GatewayError::MethodNotAllowed { method, path } => {
                format!("Method {} not allowed for {}", method, path)
            }
            GatewayError::PayloadTooLarge { limit } => {
                format!("request body exceeds {} bytes", limit)
            }
        };
        ErrorEnvelope {
            message,
            kind: self.kind(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        metrics::record_error(self.kind().as_str());
        (
            status,
            Json(ErrorBody {
                detail: self.envelope(),
            }),
        )
            .into_response()
    }
}
