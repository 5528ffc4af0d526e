//! Workout plan generation

use super::PlanError;
use crate::ai::{parse_json_reply, AiService, GenerationRequest};
use crate::catalog;
use crate::models::{Exercise, FitnessLevel, User, WorkoutDay, WorkoutExercise, WorkoutPlan};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DAYS_PER_WEEK: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    pub fitness_level: FitnessLevel,
    pub goals: Vec<String>,
    /// Minutes
    pub time_per_session: u32,
    pub days_per_week: u8,
    pub available_equipment: Vec<String>,
}

impl WorkoutRequest {
    /// Form defaults taken from the user's profile
    pub fn for_user(user: Option<&User>) -> Self {
        Self {
            fitness_level: user
                .and_then(|u| u.fitness_level)
                .unwrap_or(catalog::DEFAULT_USER_FITNESS_LEVEL),
            goals: user
                .and_then(|u| u.goals.clone())
                .unwrap_or_else(catalog::default_goals),
            time_per_session: user
                .and_then(|u| u.time_per_session)
                .unwrap_or(catalog::DEFAULT_USER_TIME_PER_SESSION),
            days_per_week: DEFAULT_DAYS_PER_WEEK,
            available_equipment: user
                .and_then(|u| u.available_equipment.clone())
                .unwrap_or_else(catalog::default_equipment),
        }
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.goals.iter().all(|g| g.trim().is_empty()) {
            return Err(PlanError::InvalidRequest(
                "Please select at least one goal.".to_string(),
            ));
        }
        if !(1..=7).contains(&self.days_per_week) {
            return Err(PlanError::InvalidRequest(
                "Days per week must be between 1 and 7.".to_string(),
            ));
        }
        if self.time_per_session == 0 {
            return Err(PlanError::InvalidRequest(
                "Time per session must be positive.".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn build_prompt(req: &WorkoutRequest, library: &[Exercise], language: &str) -> String {
    let equipment = if req.available_equipment.is_empty() {
        "bodyweight only".to_string()
    } else {
        req.available_equipment.join(", ")
    };
    let exercise_names = library
        .iter()
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let goals_json = serde_json::to_string(&req.goals).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"Create a detailed workout plan for {days} days per week.
Fitness level: {level}.
Main goals: {goals}.
Time available per session: {minutes} minutes.
Available equipment: {equipment}.
Consider the following exercises from our library (use them where appropriate, or suggest variations): {exercise_names}.

For each day of the plan, specify:
- "day": Day name (e.g. "Day 1", "Monday - Upper body focus")
- "focus": The main focus of that day's session (e.g. "Full body", "Legs and glutes").
- "exercises": A list of exercises. For each exercise:
    - "name": Exercise name (from the list above or a suitable common exercise).
    - "sets": Number of sets (e.g. "3", "3-4").
    - "reps": Reps or duration (e.g. "8-12", "15", "30 seconds").
    - "rest": Rest between sets (e.g. "60s", "45-75s").

The plan should be balanced and aim for progression.
Write the plan's text values in {language}, but keep exercise names from the library exactly as listed.
Return the answer ONLY as JSON describing a WorkoutPlan with this structure:
{{
  "id": "string (a unique id)",
  "name": "string (a creative plan name)",
  "description": "string (short plan description)",
  "fitnessLevel": "{level}",
  "goals": {goals_json},
  "days": [
    {{
      "day": "string",
      "focus": "string",
      "exercises": [
        {{ "name": "string", "sets": "string", "reps": "string", "rest": "string" }}
      ],
      "estimatedDurationMinutes": number (optional)
    }}
  ]
}}
Make sure the JSON is valid. Do not include any explanation outside the JSON."#,
        days = req.days_per_week,
        level = req.fitness_level,
        goals = req.goals.join(", "),
        minutes = req.time_per_session,
    )
}

/// Attach library ids and video links to exercises whose names match (case-insensitive)
pub fn enrich(plan: &mut WorkoutPlan, library: &[Exercise]) {
    for exercise in plan.days.iter_mut().flat_map(|d| d.exercises.iter_mut()) {
        let wanted = exercise.name.to_lowercase();
        if let Some(found) = library.iter().find(|e| e.name.to_lowercase() == wanted) {
            exercise.exercise_id = found.id.clone();
            exercise.video_url = Some(found.video_url.clone());
        }
    }
}

/// Offline stand-in
pub fn mock_plan(req: &WorkoutRequest) -> WorkoutPlan {
    WorkoutPlan {
        id: "mock-plan-1".to_string(),
        name: "Simulated Workout Plan (AI unavailable)".to_string(),
        description: None,
        fitness_level: req.fitness_level,
        goals: req.goals.clone(),
        days: vec![WorkoutDay {
            day: "Day 1".to_string(),
            focus: "Full body".to_string(),
            exercises: vec![
                WorkoutExercise {
                    exercise_id: "ex001".to_string(),
                    name: "Barbell Squat (simulated)".to_string(),
                    sets: "3".to_string(),
                    reps: "10".to_string(),
                    rest: "60s".to_string(),
                    video_url: None,
                },
                WorkoutExercise {
                    exercise_id: "ex002".to_string(),
                    name: "Push-up (simulated)".to_string(),
                    sets: "3".to_string(),
                    reps: "Max".to_string(),
                    rest: "60s".to_string(),
                    video_url: None,
                },
            ],
            estimated_duration_minutes: None,
        }],
    }
}

/// Generate a plan; `None` when the service fails or the reply is unusable
pub async fn generate_workout_plan(
    ai: &AiService,
    req: &WorkoutRequest,
    library: &[Exercise],
) -> Option<WorkoutPlan> {
    let Some(generator) = ai.generator() else {
        tracing::warn!("AI unavailable, returning mock workout plan");
        return Some(ai.offline_reply(mock_plan(req)).await);
    };

    let request = GenerationRequest::prompt(build_prompt(req, library, ai.response_language())).json();
    let text = match generator.generate(&request).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Workout plan generation failed");
            return None;
        }
    };

    let mut plan: WorkoutPlan = parse_json_reply(&text)?;
    enrich(&mut plan, library);
    tracing::info!(days = plan.days.len(), "Generated workout plan");
    Some(plan)
}
