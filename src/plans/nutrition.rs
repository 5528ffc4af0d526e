//! Nutrition plan generation

use super::PlanError;
use crate::ai::{parse_json_reply, AiService, GenerationRequest};
use crate::models::{DailyMealPlan, DailyMeals, Meal, NutritionPlan, User};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAILY_CALORIES: u32 = 2000;
const DEFAULT_GOAL: &str = "Weight loss";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRequest {
    pub goal: String,
    pub daily_calories: u32,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

impl NutritionRequest {
    /// Form defaults: the user's first goal and 2000 kcal
    pub fn for_user(user: Option<&User>) -> Self {
        let goal = user
            .and_then(|u| u.goals.as_ref())
            .and_then(|g| g.first())
            .cloned()
            .unwrap_or_else(|| DEFAULT_GOAL.to_string());

        Self {
            goal,
            daily_calories: DEFAULT_DAILY_CALORIES,
            dietary_restrictions: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.goal.trim().is_empty() {
            return Err(PlanError::InvalidRequest("A nutrition goal is required.".to_string()));
        }
        if self.daily_calories == 0 {
            return Err(PlanError::InvalidRequest(
                "Daily calories must be positive.".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn build_prompt(req: &NutritionRequest, language: &str) -> String {
    let restrictions = if req.dietary_restrictions.is_empty() {
        "No specific dietary restrictions.".to_string()
    } else {
        format!("Dietary restrictions: {}.", req.dietary_restrictions.join(", "))
    };

    format!(
        r#"Create a 7-day nutrition plan.
Goal: {goal}.
Approximate daily calorie target: {calories} kcal.
{restrictions}

For each day, suggest breakfast, a morning snack (optional), lunch, an afternoon snack (optional) and dinner.
For each meal include:
- "name": Meal name (e.g. "Egg white omelette with spinach").
- "description": Short description or main ingredients.
- "calories": Estimated calories (optional but useful).
- "protein": Estimated protein in grams (optional).
- "carbs": Estimated carbohydrates in grams (optional).
- "fats": Estimated fats in grams (optional).

The plan should be varied, balanced and use common, affordable foods.
Write the text values in {language}.
Return the answer ONLY as JSON describing a NutritionPlan with this structure:
{{
  "id": "string (a unique id)",
  "name": "string (a creative plan name)",
  "description": "string (short plan description)",
  "dailyCalorieTarget": {calories},
  "days": [
    {{
      "day": "string (e.g. 'Monday')",
      "meals": {{
        "breakfast": {{ "name": "string", "description": "string", "calories": number? }},
        "snack1": {{ "name": "string", "description": "string", "calories": number? }}?,
        "lunch": {{ "name": "string", "description": "string", "calories": number? }},
        "snack2": {{ "name": "string", "description": "string", "calories": number? }}?,
        "dinner": {{ "name": "string", "description": "string", "calories": number? }}
      }},
      "totalCalories": number? (sum of the day's calories, optional)
    }}
  ]
}}
Make sure the JSON is valid. Do not include any explanation outside the JSON."#,
        goal = req.goal,
        calories = req.daily_calories,
    )
}

/// Offline stand-in
pub fn mock_plan(req: &NutritionRequest) -> NutritionPlan {
    NutritionPlan {
        id: "mock-nutrition-1".to_string(),
        name: "Simulated Nutrition Plan (AI unavailable)".to_string(),
        description: None,
        daily_calorie_target: req.daily_calories,
        days: vec![DailyMealPlan {
            day: "Simulated day".to_string(),
            meals: DailyMeals {
                breakfast: Meal::new("Simulated breakfast", "Oats with fruit (simulated)"),
                snack1: None,
                lunch: Meal::new("Simulated lunch", "Grilled chicken and salad (simulated)"),
                snack2: None,
                dinner: Meal::new("Simulated dinner", "Baked salmon and vegetables (simulated)"),
            },
            total_calories: None,
        }],
    }
}

pub async fn generate_nutrition_plan(ai: &AiService, req: &NutritionRequest) -> Option<NutritionPlan> {
    let Some(generator) = ai.generator() else {
        tracing::warn!("AI unavailable, returning mock nutrition plan");
        return Some(ai.offline_reply(mock_plan(req)).await);
    };

    let request = GenerationRequest::prompt(build_prompt(req, ai.response_language())).json();
    match generator.generate(&request).await {
        Ok(text) => parse_json_reply(&text),
        Err(e) => {
            tracing::error!(error = %e, "Nutrition plan generation failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::config::AiConfig;
    use std::sync::Arc;

    fn request() -> NutritionRequest {
        NutritionRequest {
            goal: "Muscle gain".to_string(),
            daily_calories: 2600,
            dietary_restrictions: vec!["Lactose free".to_string(), "Vegetarian".to_string()],
        }
    }

    #[test]
    fn test_prompt() {
        let prompt = build_prompt(&request(), "English");
        assert!(prompt.contains("Goal: Muscle gain."));
        assert!(prompt.contains("Dietary restrictions: Lactose free, Vegetarian."));
        assert!(prompt.contains(r#""dailyCalorieTarget": 2600"#));

        let mut plain = request();
        plain.dietary_restrictions.clear();
        assert!(build_prompt(&plain, "English").contains("No specific dietary restrictions."));
    }

    #[test]
    fn test_defaults_use_first_goal() {
        let mut user = crate::models::User {
            id: "u".to_string(),
            email: "a@b.c".to_string(),
            name: "A".to_string(),
            avatar_url: None,
            plan: Default::default(),
            fitness_level: None,
            goals: Some(vec!["Build muscle".to_string(), "Sleep".to_string()]),
            available_equipment: None,
            time_per_session: None,
            age: None,
            gender: None,
        };
        assert_eq!(NutritionRequest::for_user(Some(&user)).goal, "Build muscle");
        user.goals = None;
        assert_eq!(NutritionRequest::for_user(Some(&user)).goal, "Weight loss");
        assert_eq!(NutritionRequest::for_user(None).daily_calories, 2000);
    }

    #[tokio::test]
    async fn test_offline_mock_uses_target() {
        let plan = generate_nutrition_plan(&AiService::offline(), &request()).await.unwrap();
        assert_eq!(plan.id, "mock-nutrition-1");
        assert_eq!(plan.daily_calorie_target, 2600);
        assert_eq!(plan.days.len(), 1);
        assert!(plan.days[0].meals.snack1.is_none());
    }

    #[tokio::test]
    async fn test_reply_parsed() {
        let reply = r#"{"name":"Focus","dailyCalorieTarget":2600,"days":[{"day":"Monday","meals":{
            "breakfast":{"name":"Oats","description":"Oats and banana","calories":400},
            "lunch":{"name":"Rice and beans","description":"Classic","calories":700},
            "dinner":{"name":"Omelette","description":"Eggs","calories":500}}}]}"#;
        let generator = Arc::new(ScriptedGenerator::new().reply(reply).fail());
        let service = AiService::new(Some(generator), &AiConfig::default());

        let plan = generate_nutrition_plan(&service, &request()).await.unwrap();
        assert_eq!(plan.days[0].calories(), Some(1600.0));
        assert!(generate_nutrition_plan(&service, &request()).await.is_none());
    }
}
