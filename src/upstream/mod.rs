//! Downstream storage service subsystem.
//!
//! # Data Flow
//! ```text
//! validated record / user id
//!     → client.rs (build request, single attempt under timeout)
//!     → 2xx: UpstreamResponse { status, body } passed through
//!     → otherwise: error.rs sorts the failure
//!         connect/timeout  → Connection  (503)
//!         non-2xx status   → Http        (status preserved)
//!         anything else    → Unexpected  (500)
//! ```

pub mod client;
pub mod error;

pub use client::{Operation, UpstreamProxy, UpstreamResponse};
pub use error::UpstreamError;
