use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;

/// Name reported by the service descriptor.
pub const SERVICE_NAME: &str = "metadata.party";

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[derive(Serialize)]
pub struct ServiceInfo {
    name: String,
    version: String,
    endpoints: BTreeMap<String, String>,
}

/// Service descriptor at `/`
pub async fn root_handler() -> Json<ServiceInfo> {
    let endpoints = BTreeMap::from([
        (
            "POST /extract".to_string(),
            "Extract metadata from 1-5 URLs (use 'url' for single or 'urls' for batch)"
                .to_string(),
        ),
        (
            "GET /health".to_string(),
            "Health check endpoint".to_string(),
        ),
    ]);

    Json(ServiceInfo {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
