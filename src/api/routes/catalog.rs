//! Catalog Routes
//!
//! Read-only reference data for the public pages and the forms.
//!
//! - GET /api/v1/catalog - App name, pricing, FAQ, testimonials, menus
//! - GET /api/v1/catalog/plans - Pricing plans
//! - GET /api/v1/catalog/exercises - Exercise library
//! - GET /api/v1/catalog/options - Goal and equipment choices, profile defaults

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::{CatalogResponse, ExerciseListResponse, OptionsResponse};
use crate::api::state::AppState;
use crate::catalog::{self, PricingPlan};
use crate::navigation;

/// GET /api/v1/catalog
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        app_name: catalog::APP_NAME,
        pricing_plans: catalog::pricing_plans(),
        faqs: catalog::faqs(),
        testimonials: catalog::testimonials(),
        value_propositions: catalog::value_propositions(),
        menus: navigation::menus(),
    })
}

/// GET /api/v1/catalog/plans
pub async fn list_pricing_plans() -> Json<Vec<PricingPlan>> {
    Json(catalog::pricing_plans())
}

/// GET /api/v1/catalog/exercises
pub async fn list_exercises(State(state): State<Arc<AppState>>) -> Json<ExerciseListResponse> {
    let exercises = state.library.as_ref().clone();
    Json(ExerciseListResponse {
        total: exercises.len(),
        exercises,
    })
}

/// GET /api/v1/catalog/options
pub async fn get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        goals: catalog::COMMON_GOALS.to_vec(),
        equipment: catalog::COMMON_EQUIPMENT.to_vec(),
        default_fitness_level: catalog::DEFAULT_USER_FITNESS_LEVEL,
        default_goals: catalog::default_goals(),
        default_equipment: catalog::default_equipment(),
        default_time_per_session: catalog::DEFAULT_USER_TIME_PER_SESSION,
    })
}
