//! Health check endpoint handlers.
//!
//! This module provides health check functionality for monitoring
//! and load balancer health checks. The only dependency worth probing is
//! the service account credential; the provider itself is never called.

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use std::collections::HashMap;
use std::time::Instant;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Basic health check
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

/// Basic health check endpoint.
///
/// Always answers `200 OK`; an unusable credential shows up as a
/// `degraded` status so the form can still be served.
///
/// # Example Response
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "timestamp": "2024-01-01T12:00:00Z",
///   "checks": {
///     "credential": {"status": "healthy", "message": "Firebase configuration is valid.", "response_time_ms": 0},
///     "provider": {"status": "healthy", "message": "Client initialized", "response_time_ms": 0}
///   }
/// }
/// ```
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();

    let credential = check_credential(&state);
    let provider = check_provider(&state).await;
    let overall = credential.status.worst(provider.status);

    checks.insert("credential".to_string(), credential);
    checks.insert("provider".to_string(), provider);

    Json(HealthResponse {
        status: overall,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    })
}

/// Readiness probe endpoint.
///
/// Ready only when the credential validates, since no message can be
/// relayed otherwise.
///
/// # Responses
/// - `200 OK` - Service is ready
/// - `503 Service Unavailable` - Credential missing or invalid
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_credential(&state).status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Liveness probe endpoint.
///
/// # Responses
/// - `200 OK` - Service is alive
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

fn check_credential(state: &AppState) -> ComponentHealth {
    let start_time = Instant::now();
    let result = state.services.credentials.check();

    ComponentHealth {
        status: if result.is_ok() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        },
        message: Some(result.message()),
        response_time_ms: Some(start_time.elapsed().as_millis() as u64),
    }
}

/// The provider client is built lazily on the first send.
async fn check_provider(state: &AppState) -> ComponentHealth {
    let start_time = Instant::now();
    let initialized = state.services.relay.handle().is_initialized().await;

    ComponentHealth {
        status: HealthStatus::Healthy,
        message: Some(
            if initialized {
                "Client initialized"
            } else {
                "Client not initialized yet"
            }
            .to_string(),
        ),
        response_time_ms: Some(start_time.elapsed().as_millis() as u64),
    }
}
