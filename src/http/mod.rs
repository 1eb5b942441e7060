//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, body limit, trace span)
//!     → handlers.rs (extract, validate, call downstream)
//!     → downstream status + body, or the error envelope
//!     → Send to client
//! ```

pub mod handlers;
pub mod server;

pub use server::{build_router, AppState, GatewayServer, X_REQUEST_ID};
