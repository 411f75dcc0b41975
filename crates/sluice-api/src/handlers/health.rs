//! Health check handlers for service monitoring.

use axum::{http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status
    pub status: HealthStatus,
    /// Timestamp when the health check was performed
    pub timestamp: DateTime<Utc>,
    /// Service version information
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
}

/// Primary health check endpoint.
///
/// The service holds no connections of its own between requests, so a
/// responsive process is a healthy one; delivery problems surface through
/// request outcomes and logs rather than this probe.
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Liveness probe for orchestration systems.
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness probe for orchestration systems.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
