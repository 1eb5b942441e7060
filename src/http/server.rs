//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the user-management routes
//! - Wire up middleware (tracing, body limit, request ID)
//! - Answer unknown routes and methods with the error envelope
//! - Bind server to listener
//! - Stop on Ctrl+C or an explicit shutdown trigger

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderName, Request},
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::schema::SecurityConfig;
use crate::config::GatewayConfig;
use crate::http::handlers;
use crate::lifecycle::shutdown::wait_for_shutdown;
use crate::upstream::UpstreamProxy;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub proxy: UpstreamProxy,
    /// Reported back when a body is rejected for size.
    pub max_body_size: usize,
}

/// HTTP server for the user gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server, building the downstream client from config.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let proxy = UpstreamProxy::from_config(&config.upstream)?;
        Ok(Self::with_proxy(config, proxy))
    }

    /// Create a server around an already constructed downstream client.
    pub fn with_proxy(config: GatewayConfig, proxy: UpstreamProxy) -> Self {
        let state = AppState {
            proxy,
            max_body_size: config.security.max_body_size,
        };
        let router = build_router(state, &config.security);
        Self { router, config }
    }

    /// The fully layered router, for serving or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server until Ctrl+C or a message on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// The body limit is enforced by the `Json` extractor so an oversized body
/// surfaces as a rejection the handler can render.
pub fn build_router(state: AppState, security: &SecurityConfig) -> Router {
    let request_id = HeaderName::from_static(X_REQUEST_ID);

    Router::new()
        .route("/add_user", post(handlers::add_user))
        .route("/get_user/{user_id}", get(handlers::get_user))
        .route("/delete_user/{user_id}", delete(handlers::delete_user))
        .route("/get_all_users", get(handlers::get_all_users))
        .route("/health", get(handlers::health))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(security.max_body_size))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
