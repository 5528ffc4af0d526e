//! Nutrition Routes
//!
//! - GET /api/v1/dashboard/nutrition?action= - Panel state, today's log, form defaults
//! - POST /api/v1/dashboard/nutrition/generate - Generate and save a plan
//! - DELETE /api/v1/dashboard/nutrition/current - Clear the current plan
//! - POST /api/v1/dashboard/nutrition/history/:id/select - Reopen a saved plan
//! - DELETE /api/v1/dashboard/nutrition/history/:id - Remove a saved plan
//! - GET /api/v1/dashboard/nutrition/food-log?date= - Entries for a day (default today)
//! - POST /api/v1/dashboard/nutrition/food-log - Log a meal
//! - DELETE /api/v1/dashboard/nutrition/food-log/:id - Remove a logged meal

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::RequireAuth;
use crate::api::dto::{FoodLogRequest, NutritionForm, NutritionResponse, ViewQuery};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{DailyFoodLog, NutritionSnapshot};
use crate::models::{FoodLogEntry, NutritionPlan};
use crate::plans::{generate_nutrition_plan, NutritionRequest};

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
}

/// GET /api/v1/dashboard/nutrition
pub async fn get_nutrition(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Query(query): Query<ViewQuery>,
) -> Json<NutritionResponse> {
    let panel = state.nutrition(&session.user.id);
    Json(NutritionResponse {
        panel: panel.snapshot(query.action.as_deref()),
        form: NutritionRequest::for_user(Some(&session.user)),
    })
}

/// POST /api/v1/dashboard/nutrition/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    body: Option<Json<NutritionForm>>,
) -> ApiResult<(StatusCode, Json<NutritionPlan>)> {
    let form = body.map(|Json(f)| f).unwrap_or_default();
    let request = form.merge(NutritionRequest::for_user(Some(&session.user)));
    request.validate()?;

    let plan = generate_nutrition_plan(&state.ai, &request).await.ok_or_else(|| {
        ApiError::Generation("Could not generate a nutrition plan. Please try again.".to_string())
    })?;

    let mut panel = state.nutrition(&session.user.id);
    let saved = panel.accept_generated(plan).clone();
    Ok((StatusCode::CREATED, Json(saved)))
}

/// DELETE /api/v1/dashboard/nutrition/current
pub async fn clear_current(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
) -> Json<NutritionSnapshot> {
    let mut panel = state.nutrition(&session.user.id);
    panel.clear_current();
    Json(panel.snapshot(None))
}

/// POST /api/v1/dashboard/nutrition/history/:id/select
pub async fn select_from_history(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<NutritionPlan>> {
    let mut panel = state.nutrition(&session.user.id);
    let plan = panel.select_from_history(&id, state.history_delay()).await?;
    Ok(Json(plan.clone()))
}

/// DELETE /api/v1/dashboard/nutrition/history/:id
pub async fn delete_from_history(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<NutritionSnapshot>> {
    let mut panel = state.nutrition(&session.user.id);
    panel.delete_from_history(&id)?;
    Ok(Json(panel.snapshot(None)))
}

/// GET /api/v1/dashboard/nutrition/food-log
pub async fn get_food_log(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Query(query): Query<DayQuery>,
) -> Json<DailyFoodLog> {
    let panel = state.nutrition(&session.user.id);
    Json(match query.date {
        Some(date) => panel.day(date),
        None => panel.today(),
    })
}

/// POST /api/v1/dashboard/nutrition/food-log
pub async fn log_food(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Json(req): Json<FoodLogRequest>,
) -> ApiResult<(StatusCode, Json<FoodLogEntry>)> {
    let mut panel = state.nutrition(&session.user.id);
    let entry = panel.log_food(&req.name, req.calories)?.clone();
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/v1/dashboard/nutrition/food-log/:id
pub async fn remove_food(
    State(state): State<Arc<AppState>>,
    RequireAuth(session): RequireAuth,
    Path(id): Path<String>,
) -> ApiResult<Json<DailyFoodLog>> {
    let mut panel = state.nutrition(&session.user.id);
    panel.remove_food(&id)?;
    Ok(Json(panel.today()))
}
