//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the storage backend answers.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match storage_usage(&state) {
        Some(_) => StatusCode::OK,
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details. Running without an AI key is
/// "degraded", not a failure: every AI feature has an offline reply.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let usage = storage_usage(&state);
    let ai_online = state.ai.is_online();

    let status = match (usage.is_some(), ai_online) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    Json(HealthResponse {
        status: status.to_string(),
        storage: if usage.is_some() { "ok" } else { "error" }.to_string(),
        backend: state.store.backend().name().to_string(),
        storage_bytes: usage,
        ai: if ai_online { "online" } else { "offline" }.to_string(),
        sessions: state.auth.session_count().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn storage_usage(state: &AppState) -> Option<usize> {
    match state.store.backend().usage_bytes() {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
