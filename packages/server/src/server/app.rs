//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use link_preview::Previewer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::server::routes::{extract_handler, health_handler, method_not_allowed, root_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub previewer: Arc<Previewer>,
}

impl AppState {
    pub fn new(previewer: Previewer) -> Self {
        Self {
            previewer: Arc::new(previewer),
        }
    }
}

/// CORS for browser clients. `*` allows any origin.
fn cors_layer(allowed_origin: &str) -> Result<CorsLayer> {
    let origin = if allowed_origin == "*" {
        AllowOrigin::any()
    } else {
        let value = HeaderValue::from_str(allowed_origin)
            .context("ALLOWED_ORIGIN must be a valid header value")?;
        AllowOrigin::exact(value)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}

/// Build the Axum application router
///
/// Request tracing and CORS wrap the routes as layers; the preview pipeline
/// itself never sees them.
pub fn build_app(previewer: Previewer, allowed_origin: &str) -> Result<Router> {
    let state = AppState::new(previewer);

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route(
            "/extract",
            post(extract_handler).fallback(method_not_allowed),
        )
        .with_state(state)
        .layer(cors_layer(allowed_origin)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
