//! User Gateway
//!
//! A validating gateway in front of a user storage service, built with
//! Tokio, Axum and reqwest.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                  USER GATEWAY                     │
//!                        │                                                   │
//!   Client Request       │  ┌─────────┐    ┌───────────┐    ┌────────────┐  │
//!   ─────────────────────┼─▶│  http   │───▶│   users   │───▶│  upstream  │──┼──▶ Storage
//!                        │  │ handlers│    │ validator │    │   proxy    │  │    Service
//!                        │  └────┬────┘    └─────┬─────┘    └─────┬──────┘  │
//!                        │       │               │ 422            │         │
//!   Client Response      │       ▼               ▼                ▼         │
//!   ◀────────────────────┼── status + body  or  {"detail": {error, type}}   │
//!                        │                                                   │
//!                        │  ┌──────────┐ ┌───────────────┐ ┌────────────┐   │
//!                        │  │  config  │ │ observability │ │ lifecycle  │   │
//!                        │  └──────────┘ └───────────────┘ └────────────┘   │
//!                        └──────────────────────────────────────────────────┘
//! ```
//!
//! # Error Categories
//! - `validation_error` (422, or 413 for an oversized body): input rejected
//!   locally, nothing sent downstream
//! - `connection_error` (503): downstream unreachable or timed out
//! - `http_error` (downstream status): downstream answered non-2xx
//! - `unexpected_error` (500): anything else
//! - `not_found` (404, or 405 for a known route with the wrong method): no such
//!   gateway route

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod upstream;
pub mod users;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use error::{ErrorBody, ErrorEnvelope, ErrorKind, GatewayError};
