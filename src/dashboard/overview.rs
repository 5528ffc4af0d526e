//! Landing card: a motivational quote plus the next workout and meal

use crate::ai::AiService;
use crate::catalog;
use crate::models::{NutritionPlan, User, WorkoutPlan};
use crate::plans::content::{generate_general_content, motivational_message};
use serde::Serialize;

const WORKOUT_TEASER: &str = "Discover personalized workouts!";
const MEAL_TEASER: &str = "Explore AI nutrition plans!";
const WORKOUT_FALLBACK: &str = "Try a new AI workout!";
const MEAL_FALLBACK: &str = "Ask the AI for a meal idea!";
const REVIEW_PLAN: &str = "Review plan";
const CHECK_PLAN: &str = "Check your plan";
const BALANCED_DIET: &str = "a balanced diet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
    Plan,
    AiGeneric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub source: SuggestionSource,
}

impl Suggestion {
    fn teaser(name: &str) -> Self {
        Self {
            name: name.to_string(),
            detail: None,
            source: SuggestionSource::AiGeneric,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub quote: String,
    pub next_workout: Suggestion,
    pub next_meal: Suggestion,
}

/// Assemble the overview; signed-out callers get teasers instead of suggestions
pub async fn build_overview(
    ai: &AiService,
    user: Option<&User>,
    workout: Option<&WorkoutPlan>,
    nutrition: Option<&NutritionPlan>,
) -> Overview {
    let quote = motivational_message(ai).await;

    let Some(user) = user else {
        return Overview {
            quote,
            next_workout: Suggestion::teaser(WORKOUT_TEASER),
            next_meal: Suggestion::teaser(MEAL_TEASER),
        };
    };

    let next_workout = match workout.and_then(|p| p.days.first()) {
        Some(day) => Suggestion {
            name: format!(
                "From your plan: {} - {}",
                day.focus,
                day.exercises.first().map(|e| e.name.as_str()).unwrap_or(REVIEW_PLAN)
            ),
            detail: Some(CHECK_PLAN.to_string()),
            source: SuggestionSource::Plan,
        },
        None => {
            let text = generate_general_content(ai, &workout_prompt(user)).await;
            Suggestion {
                name: non_empty_or(text, WORKOUT_FALLBACK),
                detail: None,
                source: SuggestionSource::AiGeneric,
            }
        }
    };

    let next_meal = match nutrition.and_then(|p| p.days.first()) {
        Some(day) => {
            let meals = &day.meals;
            let pick = if !meals.lunch.name.trim().is_empty() {
                Some((&meals.lunch, "Lunch"))
            } else if !meals.breakfast.name.trim().is_empty() {
                Some((&meals.breakfast, "Breakfast"))
            } else {
                None
            };
            Suggestion {
                name: format!(
                    "From your plan: {}",
                    pick.map(|(m, _)| m.name.as_str()).unwrap_or(REVIEW_PLAN)
                ),
                detail: Some(pick.map(|(_, kind)| kind).unwrap_or(CHECK_PLAN).to_string()),
                source: SuggestionSource::Plan,
            }
        }
        None => {
            let text = generate_general_content(ai, &meal_prompt(user)).await;
            Suggestion {
                name: non_empty_or(text, MEAL_FALLBACK),
                detail: Some("AI tip".to_string()),
                source: SuggestionSource::AiGeneric,
            }
        }
    };

    Overview {
        quote,
        next_workout,
        next_meal,
    }
}

fn workout_prompt(user: &User) -> String {
    let level = user.fitness_level.unwrap_or(catalog::DEFAULT_USER_FITNESS_LEVEL);
    let minutes = user
        .time_per_session
        .unwrap_or(catalog::DEFAULT_USER_TIME_PER_SESSION);
    format!(
        "Suggest a quick, effective type of workout a {} user can do today in {} minutes. Reply with the workout name or focus only. Max 10 words.",
        level.to_string().to_lowercase(),
        minutes
    )
}

/// The first goal about weight, mass or nutrition drives the meal idea
fn meal_prompt(user: &User) -> String {
    let goal = user
        .goals
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find(|g| {
            let g = g.to_lowercase();
            g.contains("weight") || g.contains("mass") || g.contains("nutrition")
        })
        .map(String::as_str)
        .unwrap_or(BALANCED_DIET);
    format!(
        "Suggest a healthy, easy meal (lunch or dinner) for someone aiming for {}. Meal name only. Max 10 words.",
        goal
    )
}

fn non_empty_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::config::AiConfig;
    use crate::models::{DailyMealPlan, DailyMeals, FitnessLevel, Meal, SubscriptionTier, WorkoutDay, WorkoutExercise};
    use std::sync::Arc;

    fn user(goals: &[&str]) -> User {
        User {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            avatar_url: None,
            plan: SubscriptionTier::Basic,
            fitness_level: Some(FitnessLevel::Intermediate),
            goals: Some(goals.iter().map(|g| g.to_string()).collect()),
            available_equipment: None,
            time_per_session: Some(40),
            age: None,
            gender: None,
        }
    }

    fn workout_plan(exercises: Vec<WorkoutExercise>) -> WorkoutPlan {
        WorkoutPlan {
            days: vec![WorkoutDay {
                day: "Monday".to_string(),
                focus: "Full body".to_string(),
                exercises,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_signed_out_gets_teasers() {
        let overview = build_overview(&AiService::offline(), None, None, None).await;
        assert_eq!(overview.next_workout.name, WORKOUT_TEASER);
        assert_eq!(overview.next_meal.name, MEAL_TEASER);
        assert!(!overview.quote.is_empty());
    }

    #[tokio::test]
    async fn test_suggestions_from_plans() {
        let workout = workout_plan(vec![WorkoutExercise {
            name: "Push-up".to_string(),
            ..Default::default()
        }]);
        let nutrition = NutritionPlan {
            days: vec![DailyMealPlan {
                day: "Day 1".to_string(),
                meals: DailyMeals {
                    breakfast: Meal::new("Oats", "Oats with fruit"),
                    snack1: None,
                    lunch: Meal::new("Chicken salad", "Grilled chicken"),
                    snack2: None,
                    dinner: Meal::new("Soup", "Vegetable soup"),
                },
                total_calories: None,
            }],
            ..Default::default()
        };

        let u = user(&[]);
        let overview = build_overview(&AiService::offline(), Some(&u), Some(&workout), Some(&nutrition)).await;
        assert_eq!(overview.next_workout.name, "From your plan: Full body - Push-up");
        assert_eq!(overview.next_workout.detail.as_deref(), Some(CHECK_PLAN));
        assert_eq!(overview.next_meal.name, "From your plan: Chicken salad");
        assert_eq!(overview.next_meal.detail.as_deref(), Some("Lunch"));
        assert_eq!(overview.next_meal.source, SuggestionSource::Plan);
    }

    #[tokio::test]
    async fn test_plan_day_without_exercises() {
        let workout = workout_plan(Vec::new());
        let u = user(&[]);
        let overview = build_overview(&AiService::offline(), Some(&u), Some(&workout), None).await;
        assert_eq!(overview.next_workout.name, "From your plan: Full body - Review plan");
    }

    #[tokio::test]
    async fn test_ai_prompts_use_profile() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .reply("Stay strong")
                .reply("HIIT circuit")
                .reply("Grilled fish with rice"),
        );
        let ai = AiService::new(Some(generator.clone()), &AiConfig::default());
        let u = user(&["Improve conditioning", "Lose weight"]);

        let overview = build_overview(&ai, Some(&u), None, None).await;
        assert_eq!(overview.next_workout.name, "HIIT circuit");
        assert_eq!(overview.next_meal.name, "Grilled fish with rice");

        let requests = generator.requests();
        let workout_prompt = &requests[1].contents[0].text;
        assert!(workout_prompt.contains("intermediate user"));
        assert!(workout_prompt.contains("40 minutes"));
        assert!(requests[2].contents[0].text.contains("aiming for Lose weight"));
    }

    #[test]
    fn test_meal_prompt_defaults_to_balanced_diet() {
        assert!(meal_prompt(&user(&["Run a marathon"])).contains(BALANCED_DIET));
    }
}
