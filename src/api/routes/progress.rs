//! Progress Routes
//!
//! - GET /api/v1/dashboard/progress - Metric series and body scans
//! - POST /api/v1/dashboard/progress/metrics/:name/points - Add a point to a series
//! - POST /api/v1/dashboard/progress/body-scans - Record a scan and get feedback
//! - DELETE /api/v1/dashboard/progress/body-scans/:date - Remove the scans of a day
//! - GET /api/v1/dashboard/progress/export - Metric points as CSV

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::auth::RequireAuth;
use crate::api::dto::MetricPointRequest;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::dashboard::{BodyScanInput, BodyScanResult, ProgressSnapshot};
use crate::models::ProgressMetric;

/// GET /api/v1/dashboard/progress
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> Json<ProgressSnapshot> {
    Json(state.progress(&session.user.id).snapshot())
}

/// POST /api/v1/dashboard/progress/metrics/:name/points
pub async fn log_metric(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(name): Path<String>,
    Json(req): Json<MetricPointRequest>,
) -> ApiResult<(StatusCode, Json<ProgressMetric>)> {
    let mut panel = state.progress(&session.user.id);
    let metric = panel.log_metric(&name, req.date, req.value)?.clone();
    Ok((StatusCode::CREATED, Json(metric)))
}

/// POST /api/v1/dashboard/progress/body-scans
pub async fn add_body_scan(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(input): Json<BodyScanInput>,
) -> ApiResult<(StatusCode, Json<BodyScanResult>)> {
    let mut panel = state.progress(&session.user.id);
    let result = panel.add_body_scan(input, &session.user, &state.ai).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// DELETE /api/v1/dashboard/progress/body-scans/:date
pub async fn delete_body_scan(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(date): Path<NaiveDate>,
) -> ApiResult<StatusCode> {
    state.progress(&session.user.id).delete_body_scan(date)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/dashboard/progress/export
pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> ApiResult<impl IntoResponse> {
    let csv = state.progress(&session.user.id).export_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"progress.csv\""),
        ],
        csv,
    ))
}
