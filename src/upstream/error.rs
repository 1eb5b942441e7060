//! Downstream failure taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

use crate::error::ErrorKind;

/// A failed downstream call, already sorted into a client-facing category.
///
/// `Display` carries the internal detail for logs; [`client_message`]
/// is what callers see.
///
/// [`client_message`]: UpstreamError::client_message
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Downstream unreachable, refused the connection, or timed out.
    #[error("downstream connection failed: {0}")]
    Connection(String),

    /// Downstream answered with a non-success status.
    #[error("downstream returned status {status}")]
    Http { status: StatusCode },

    /// Any other failure during the call.
    #[error("unexpected downstream failure: {0}")]
    Unexpected(String),
}

impl UpstreamError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UpstreamError::Connection(_) => ErrorKind::ConnectionError,
            UpstreamError::Http { .. } => ErrorKind::HttpError,
            UpstreamError::Unexpected(_) => ErrorKind::UnexpectedError,
        }
    }

    /// Status surfaced to the caller. HTTP errors keep the downstream code.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            UpstreamError::Http { status } => *status,
            UpstreamError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_message(&self) -> String {
        match self {
            UpstreamError::Connection(_) => "Downstream service unavailable".to_string(),
            UpstreamError::Http { status } => {
                format!("Downstream service returned error: {}", status)
            }
            UpstreamError::Unexpected(_) => "Internal server error".to_string(),
        }
    }

    /// Sort a transport error into a category. Non-2xx statuses never reach
    /// here; they are read off the response.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            UpstreamError::Connection(err.to_string())
        } else {
            UpstreamError::Unexpected(err.to_string())
        }
    }
}
