//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{FaqItem, PricingPlan, Testimonial, ValueProposition};
use crate::dashboard::{NutritionSnapshot, PlanPanelSnapshot};
use crate::models::{Exercise, FitnessLevel, SubscriptionTier, User, WorkoutPlan};
use crate::navigation::Menus;
use crate::plans::{NutritionRequest, WorkoutRequest};

// ============================================
// AUTH DTOs
// ============================================

/// Returned by register and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct PlanChangeRequest {
    pub plan: SubscriptionTier,
}

// ============================================
// CATALOG & NAVIGATION DTOs
// ============================================

/// Everything a client needs to render the public pages
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub app_name: &'static str,
    pub pricing_plans: Vec<PricingPlan>,
    pub faqs: Vec<FaqItem>,
    pub testimonials: Vec<Testimonial>,
    pub value_propositions: Vec<ValueProposition>,
    pub menus: Menus,
}

/// Form options and profile defaults
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub goals: Vec<&'static str>,
    pub equipment: Vec<&'static str>,
    pub default_fitness_level: FitnessLevel,
    pub default_goals: Vec<String>,
    pub default_equipment: Vec<String>,
    pub default_time_per_session: u32,
}

#[derive(Debug, Serialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<Exercise>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub path: String,
}

// ============================================
// DASHBOARD DTOs
// ============================================

/// `?action=` deep link for the plan panels
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutsResponse {
    #[serde(flatten)]
    pub panel: PlanPanelSnapshot<WorkoutPlan>,
    /// Generator form pre-filled from the profile
    pub form: WorkoutRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionResponse {
    #[serde(flatten)]
    pub panel: NutritionSnapshot,
    pub form: NutritionRequest,
}

/// Workout generator form; absent fields fall back to the profile
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutForm {
    pub fitness_level: Option<FitnessLevel>,
    pub goals: Option<Vec<String>>,
    pub time_per_session: Option<u32>,
    pub days_per_week: Option<u8>,
    pub available_equipment: Option<Vec<String>>,
}

impl WorkoutForm {
    pub fn merge(self, mut base: WorkoutRequest) -> WorkoutRequest {
        if let Some(level) = self.fitness_level {
            base.fitness_level = level;
        }
        if let Some(goals) = self.goals {
            base.goals = goals;
        }
        if let Some(minutes) = self.time_per_session {
            base.time_per_session = minutes;
        }
        if let Some(days) = self.days_per_week {
            base.days_per_week = days;
        }
        if let Some(equipment) = self.available_equipment {
            base.available_equipment = equipment;
        }
        base
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionForm {
    pub goal: Option<String>,
    pub daily_calories: Option<u32>,
    pub dietary_restrictions: Option<Vec<String>>,
}

impl NutritionForm {
    pub fn merge(self, mut base: NutritionRequest) -> NutritionRequest {
        if let Some(goal) = self.goal {
            base.goal = goal;
        }
        if let Some(calories) = self.daily_calories {
            base.daily_calories = calories;
        }
        if let Some(restrictions) = self.dietary_restrictions {
            base.dietary_restrictions = restrictions;
        }
        base
    }
}

#[derive(Debug, Deserialize)]
pub struct FoodLogRequest {
    pub name: String,
    /// Signed so that negative input reaches validation instead of failing to parse
    pub calories: i64,
}

#[derive(Debug, Deserialize)]
pub struct MetricPointRequest {
    pub date: NaiveDate,
    pub value: f64,
}

// ============================================
// CHAT & COMMUNITY DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    pub content: String,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy", "degraded"
    pub status: String,
    /// Storage backend status
    pub storage: String,
    /// Backend name
    pub backend: String,
    /// Bytes held by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_bytes: Option<usize>,
    /// "online" or "offline"
    pub ai: String,
    pub sessions: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workout_form_merges_over_profile() {
        let base = WorkoutRequest::for_user(None);
        let form: WorkoutForm = serde_json::from_str(r#"{"daysPerWeek": 5, "goals": ["Strength"]}"#).unwrap();
        let merged = form.merge(base.clone());

        assert_eq!(merged.days_per_week, 5);
        assert_eq!(merged.goals, vec!["Strength".to_string()]);
        assert_eq!(merged.fitness_level, base.fitness_level);
        assert_eq!(merged.available_equipment, base.available_equipment);
    }

    #[test]
    fn test_nutrition_form_merges_over_profile() {
        let form: NutritionForm = serde_json::from_str(r#"{"dailyCalories": 1800}"#).unwrap();
        let merged = form.merge(NutritionRequest::for_user(None));
        assert_eq!(merged.daily_calories, 1800);
        assert_eq!(merged.goal, "Weight loss");
    }
}
