//! Workout Routes
//!
//! - GET /api/v1/dashboard/workouts?action= - Panel state and form defaults
//! - POST /api/v1/dashboard/workouts/generate - Generate and save a plan
//! - DELETE /api/v1/dashboard/workouts/current - Clear the current plan
//! - POST /api/v1/dashboard/workouts/history/:id/select - Reopen a saved plan
//! - DELETE /api/v1/dashboard/workouts/history/:id - Remove a saved plan

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::auth::RequireAuth;
use crate::api::dto::{ViewQuery, WorkoutForm, WorkoutsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::PlanPanelSnapshot;
use crate::models::WorkoutPlan;
use crate::plans::{generate_workout_plan, WorkoutRequest};

/// GET /api/v1/dashboard/workouts
pub async fn get_workouts(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Query(query): Query<ViewQuery>,
) -> Json<WorkoutsResponse> {
    let panel = state.workouts(&session.user.id);
    Json(WorkoutsResponse {
        panel: panel.snapshot(query.action.as_deref()),
        form: WorkoutRequest::for_user(Some(&session.user)),
    })
}

/// POST /api/v1/dashboard/workouts/generate
///
/// Absent form fields are taken from the profile.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    body: Option<Json<WorkoutForm>>,
) -> ApiResult<(StatusCode, Json<WorkoutPlan>)> {
    let form = body.map(|Json(f)| f).unwrap_or_default();
    let request = form.merge(WorkoutRequest::for_user(Some(&session.user)));
    request.validate()?;

    let plan = generate_workout_plan(&state.ai, &request, &state.library)
        .await
        .ok_or_else(|| {
            ApiError::Generation("Could not generate a workout plan. Please try again.".to_string())
        })?;

    let mut panel = state.workouts(&session.user.id);
    let saved = panel.accept_generated(plan).clone();
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/dashboard/workouts/current
pub async fn clear_current(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> Json<PlanPanelSnapshot<WorkoutPlan>> {
    let mut panel = state.workouts(&session.user.id);
    panel.clear_current();
    Json(panel.snapshot(None))
}

/// POST /api/v1/dashboard/workouts/history/:id/select
pub async fn select_from_history(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkoutPlan>> {
    let mut panel = state.workouts(&session.user.id);
    let plan = panel.select_from_history(&id, state.history_delay()).await?;
    Ok(Json(plan.clone()))
}

/// DELETE /api/v1/dashboard/workouts/history/:id
pub async fn delete_from_history(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<PlanPanelSnapshot<WorkoutPlan>>> {
    let mut panel = state.workouts(&session.user.id);
    panel.delete_from_history(&id)?;
    Ok(Json(panel.snapshot(None)))
}
