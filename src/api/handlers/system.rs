//! System endpoints: service banner and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Service banner.
#[derive(Debug, Serialize, ToSchema)]
struct ServiceInfo {
    service: String,
    status: String,
    version: String,
    restaurants: usize,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /` — Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Service banner",
    description = "Returns the service name, version and number of registered restaurants.",
    responses(
        (status = 200, description = "Service banner", body = ServiceInfo),
    )
)]
pub async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let restaurants = state.relay_service.registry().len().await;
    (
        StatusCode::OK,
        Json(ServiceInfo {
            service: "RestoBot".to_string(),
            status: "running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            restaurants,
        }),
    )
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
