//! Core data types
//!
//! Plain serializable records shared by the store, the plan generators and
//! the API. Field names serialize in camelCase, which is both the shape the
//! generative model is asked to reply with and the shape persisted per user.
//!
//! - `User`, `SubscriptionTier`, `FitnessLevel`: profile
//! - `WorkoutPlan`, `NutritionPlan`: generated plans (ordered day records)
//! - `ProgressMetric`, `BodyScanMetrics`: time series
//! - `ChatMessage`, `CommunityPost`, `CommunityChallenge`: conversational data

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Profile
// ============================================

/// Subscription tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum SubscriptionTier {
    #[default]
    None,
    Basic,
    Premium,
    Elite,
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionTier::None => write!(f, "None"),
            SubscriptionTier::Basic => write!(f, "Basic"),
            SubscriptionTier::Premium => write!(f, "Premium"),
            SubscriptionTier::Elite => write!(f, "Elite"),
        }
    }
}

/// Training experience level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitnessLevel::Beginner => write!(f, "Beginner"),
            FitnessLevel::Intermediate => write!(f, "Intermediate"),
            FitnessLevel::Advanced => write!(f, "Advanced"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// Weekly physical activity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityLevel::Sedentary => write!(f, "sedentary"),
            ActivityLevel::Light => write!(f, "light"),
            ActivityLevel::Moderate => write!(f, "moderate"),
            ActivityLevel::Active => write!(f, "active"),
            ActivityLevel::VeryActive => write!(f, "very_active"),
        }
    }
}

/// A signed-in user's profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Subscription tier
    pub plan: SubscriptionTier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_equipment: Option<Vec<String>>,
    /// Minutes available per training session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_per_session: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

// ============================================
// Workouts
// ============================================

/// Library exercise
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub description: String,
    pub video_url: String,
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment_needed: Vec<String>,
    pub difficulty: FitnessLevel,
}

/// One exercise inside a workout day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    /// Library exercise id, empty when the exercise is not in the library
    #[serde(default)]
    pub exercise_id: String,
    pub name: String,
    /// Number of sets, e.g. "3-4"
    #[serde(default)]
    pub sets: String,
    /// Reps or duration, e.g. "8-12" or "30 seconds"
    #[serde(default)]
    pub reps: String,
    /// Rest between sets, e.g. "60s"
    #[serde(default)]
    pub rest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    /// Day label, e.g. "Day 1" or "Monday - Upper body"
    pub day: String,
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,
}

/// A generated workout schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    #[serde(default)]
    pub goals: Vec<String>,
}

// ============================================
// Nutrition
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Meal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<f64>,
}

impl Meal {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// The meals of one day. Snacks are optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DailyMeals {
    pub breakfast: Meal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack1: Option<Meal>,
    pub lunch: Meal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snack2: Option<Meal>,
    pub dinner: Meal,
}

impl DailyMeals {
    /// Meals in eating order
    pub fn iter(&self) -> impl Iterator<Item = &Meal> {
        [
            Some(&self.breakfast),
            self.snack1.as_ref(),
            Some(&self.lunch),
            self.snack2.as_ref(),
            Some(&self.dinner),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyMealPlan {
    pub day: String,
    pub meals: DailyMeals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
}

impl DailyMealPlan {
    /// Stated total, or the sum of the meals that carry a calorie estimate
    pub fn calories(&self) -> Option<f64> {
        self.total_calories.or_else(|| {
            let estimates: Vec<f64> = self.meals.iter().filter_map(|m| m.calories).collect();
            if estimates.is_empty() {
                None
            } else {
                Some(estimates.iter().sum())
            }
        })
    }
}

/// A generated meal schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPlan {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub daily_calorie_target: u32,
    #[serde(default)]
    pub days: Vec<DailyMealPlan>,
}

/// A meal the user ate, logged by hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoodLogEntry {
    pub id: String,
    pub name: String,
    pub calories: u32,
    /// Local time of day, `HH:MM`
    pub time: String,
    pub date: NaiveDate,
}

// ============================================
// Progress
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressDataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A named, unit-bearing time series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressMetric {
    pub name: String,
    pub unit: String,
    #[serde(default)]
    pub data: Vec<ProgressDataPoint>,
}

impl ProgressMetric {
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            data: Vec::new(),
        }
    }

    /// Most recent value, if any
    pub fn latest(&self) -> Option<&ProgressDataPoint> {
        self.data.last()
    }
}

/// One simulated body-composition scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BodyScanMetrics {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_mass_kg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
}

// ============================================
// Chat & community
// ============================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: format!("{}-{}", sender_prefix(sender), timestamp.timestamp_millis()),
            text: text.into(),
            sender,
            timestamp,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Sender::System, text)
    }
}

fn sender_prefix(sender: Sender) -> &'static str {
    match sender {
        Sender::User => "user",
        Sender::Ai => "ai",
        Sender::System => "system",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub likes: u32,
    pub comments: u32,
}

/// Who created a challenge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChallengeSource {
    #[serde(rename = "AI")]
    Ai,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommunityChallenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub generated_by: ChallengeSource,
    pub duration_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_points: Option<u32>,
}
