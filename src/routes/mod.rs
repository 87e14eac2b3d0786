pub mod health;
pub mod proxy;

use crate::config::{Config, ResponseMode};
use crate::proxy::{HttpUpstreamService, UpstreamService};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn UpstreamService>,
    pub response_mode: ResponseMode,
}

impl AppState {
    pub fn new(upstream: Arc<dyn UpstreamService>, response_mode: ResponseMode) -> Self {
        Self {
            upstream,
            response_mode,
        }
    }

    /// State backed by the reqwest upstream service.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let upstream: Arc<dyn UpstreamService> = HttpUpstreamService::arc(config)?;
        Ok(Self::new(upstream, config.response_mode))
    }
}

/// Cross-origin policy: any origin, the methods and headers the UI uses.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/proxy", post(proxy::proxy_request))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
