//! HTTP API for the auth proxy.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{logging_middleware, preflight_middleware};
pub use types::*;

use crate::error::ProxyError;
use crate::upstream::BaasClient;
use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE,
        },
        HeaderValue,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Upstream client, absent when credentials were not configured
    pub baas: Option<Arc<BaasClient>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(baas: Option<BaasClient>) -> Self {
        Self {
            baas: baas.map(Arc::new),
        }
    }

    /// Upstream client, or a transport error when running without credentials.
    pub fn baas(&self) -> Result<&BaasClient, ProxyError> {
        self.baas.as_deref().ok_or_else(|| {
            ProxyError::Transport("upstream credentials not configured".to_string())
        })
    }
}

/// Create the API router.
///
/// This is also the per-request entry point when the proxy is embedded in a host runtime.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/auth/test-connection",
            get(handlers::test_connection).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api/auth/register",
            post(handlers::register).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(preflight_middleware))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
