//! Reference data
//!
//! Static content the service exposes read-only: the exercise library the
//! workout generator enriches plans from, pricing, FAQ, testimonials and
//! profile defaults.

use crate::models::{Exercise, FitnessLevel, SubscriptionTier};
use serde::Serialize;

pub const APP_NAME: &str = "FitLife";

/// Default generative text model
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

pub const DEFAULT_USER_FITNESS_LEVEL: FitnessLevel = FitnessLevel::Beginner;
pub const DEFAULT_USER_GOALS: &[&str] = &["Improve conditioning"];
pub const DEFAULT_USER_EQUIPMENT: &[&str] = &["None (Bodyweight)"];
/// Minutes
pub const DEFAULT_USER_TIME_PER_SESSION: u32 = 30;

pub const COMMON_GOALS: &[&str] = &[
    "Lose weight",
    "Build muscle",
    "Improve conditioning",
    "Increase strength",
    "More flexibility",
    "Reduce stress",
];

pub const COMMON_EQUIPMENT: &[&str] = &[
    "Dumbbells",
    "Barbell",
    "Weight plates",
    "Kettlebell",
    "Resistance bands",
    "Jump rope",
    "Treadmill",
    "Stationary bike",
    "Pilates ball",
    "None (Bodyweight)",
];

pub fn default_goals() -> Vec<String> {
    DEFAULT_USER_GOALS.iter().map(|s| s.to_string()).collect()
}

pub fn default_equipment() -> Vec<String> {
    DEFAULT_USER_EQUIPMENT.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanFeature {
    pub text: &'static str,
    pub included: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: SubscriptionTier,
    pub name: &'static str,
    pub price_per_month: u32,
    pub features: Vec<PlanFeature>,
    pub cta_text: &'static str,
    pub highlight: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FaqItem {
    pub id: &'static str,
    pub question: &'static str,
    pub answer: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: &'static str,
    pub name: &'static str,
    pub avatar_url: &'static str,
    /// 1-5
    pub rating: u8,
    pub text: &'static str,
    pub category: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueProposition {
    pub id: u32,
    pub title: &'static str,
    pub description: &'static str,
}

fn feature(text: &'static str, included: bool) -> PlanFeature {
    PlanFeature { text, included }
}

pub fn pricing_plans() -> Vec<PricingPlan> {
    vec![
        PricingPlan {
            id: SubscriptionTier::Basic,
            name: "Basic",
            price_per_month: 49,
            features: vec![
                feature("Basic AI personal trainer", true),
                feature("3 personalized workouts per week", true),
                feature("Basic nutrition plan", true),
                feature("Community access", true),
                feature("24/7 AI nutritionist", false),
                feature("Detailed body analysis", false),
            ],
            cta_text: "Start now",
            highlight: false,
        },
        PricingPlan {
            id: SubscriptionTier::Premium,
            name: "Premium",
            price_per_month: 99,
            features: vec![
                feature("Advanced AI personal trainer", true),
                feature("Unlimited workouts", true),
                feature("24/7 AI nutritionist", true),
                feature("Detailed body analysis", true),
                feature("Priority support", true),
                feature("Dedicated AI coach", false),
            ],
            cta_text: "Choose Premium",
            highlight: true,
        },
        PricingPlan {
            id: SubscriptionTier::Elite,
            name: "Elite",
            price_per_month: 149,
            features: vec![
                feature("Everything in Premium", true),
                feature("Dedicated AI coach", true),
                feature("AI supplementation plans", true),
                feature("Virtual medical consultation (simulated)", true),
                feature("Early access to new features", true),
            ],
            cta_text: "Go Elite",
            highlight: false,
        },
    ]
}

/// Look up the pricing entry for a tier
pub fn pricing_plan(tier: SubscriptionTier) -> Option<PricingPlan> {
    pricing_plans().into_iter().find(|p| p.id == tier)
}

pub fn faqs() -> Vec<FaqItem> {
    vec![
        FaqItem {
            id: "1",
            question: "How does the AI personalize my workouts?",
            answer: "It looks at your fitness level, goals, available time and equipment to build a unique, progressive plan.",
            category: "Workouts",
        },
        FaqItem {
            id: "2",
            question: "Are the nutrition plans written by real nutritionists?",
            answer: "Plans are generated by a nutrition-focused AI. For specific medical conditions, consult a professional.",
            category: "Nutrition",
        },
        FaqItem {
            id: "3",
            question: "Can I cancel my subscription at any time?",
            answer: "Yes, from your dashboard, with no extra fees.",
            category: "Plans and payments",
        },
        FaqItem {
            id: "4",
            question: "How does AI matching work in the community?",
            answer: "It compares interests, goals and activity level to suggest compatible training partners and groups.",
            category: "Community",
        },
        FaqItem {
            id: "5",
            question: "What happens if I miss a workout?",
            answer: "The AI can adjust your plan. You can also reschedule or ask for an alternative session.",
            category: "Workouts",
        },
    ]
}

pub fn testimonials() -> Vec<Testimonial> {
    vec![
        Testimonial {
            id: "1",
            name: "Ana Silva",
            avatar_url: "https://picsum.photos/seed/ana/100/100",
            rating: 5,
            text: "FitLife changed my routine. The workouts fit me perfectly and the AI nutritionist is great.",
            category: "Weight loss",
        },
        Testimonial {
            id: "2",
            name: "Carlos Pereira",
            avatar_url: "https://picsum.photos/seed/carlos/100/100",
            rating: 4,
            text: "Finally a platform that adapts to my day. Recommended!",
            category: "Muscle gain",
        },
        Testimonial {
            id: "3",
            name: "Julia Santos",
            avatar_url: "https://picsum.photos/seed/julia/100/100",
            rating: 5,
            text: "The community keeps me motivated and the AI challenges keep me engaged.",
            category: "General wellbeing",
        },
        Testimonial {
            id: "4",
            name: "Marcos Lima",
            avatar_url: "https://picsum.photos/seed/marcos/100/100",
            rating: 5,
            text: "Visible results in a few weeks. The AI really understands what I need.",
            category: "Performance",
        },
    ]
}

pub fn value_propositions() -> Vec<ValueProposition> {
    let items = [
        ("AI personal training", "Adaptive workouts built around your goals and progress."),
        ("Smart nutrition guidance", "A 24/7 AI nutritionist for meal plans and tips."),
        ("Continuous support", "A motivational chatbot that keeps you focused."),
        ("Total flexibility", "Plans adapt to your routine and available equipment."),
        ("Smart community", "Find training partners and groups that match your profile."),
        ("Proven results", "An interactive dashboard with metrics and visual progress."),
    ];

    items
        .iter()
        .enumerate()
        .map(|(i, (title, description))| ValueProposition {
            id: i as u32 + 1,
            title,
            description,
        })
        .collect()
}

fn exercise(
    id: &str,
    name: &str,
    description: &str,
    seed: &str,
    muscle_groups: &[&str],
    difficulty: FitnessLevel,
    equipment_needed: &[&str],
) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        video_url: format!("https://picsum.photos/seed/{}/300/200", seed),
        muscle_groups: muscle_groups.iter().map(|s| s.to_string()).collect(),
        equipment_needed: equipment_needed.iter().map(|s| s.to_string()).collect(),
        difficulty,
    }
}

/// Exercises the workout generator offers to the model and matches replies against
pub fn exercise_library() -> Vec<Exercise> {
    use FitnessLevel::*;

    vec![
        exercise("ex001", "Barbell Squat", "Strengthens legs and glutes. Keep a neutral spine.", "squat",
            &["Quadriceps", "Glutes", "Hamstrings"], Intermediate, &["Barbell", "Weight plates (optional)"]),
        exercise("ex002", "Push-up", "Works chest, shoulders and triceps.", "pushup",
            &["Chest", "Shoulders", "Triceps"], Beginner, &[]),
        exercise("ex003", "Plank", "Strengthens the core. Keep the body aligned.", "plank",
            &["Abs", "Core"], Beginner, &[]),
        exercise("ex004", "Deadlift", "Compound lift working several muscle groups.", "deadlift",
            &["Back", "Glutes", "Hamstrings", "Core"], Advanced, &["Barbell", "Weight plates"]),
        exercise("ex005", "Jogging in Place", "Good for warm-ups and light cardio.", "jogging",
            &["Cardiovascular", "Legs"], Beginner, &[]),
        exercise("ex006", "Lunge", "Builds leg and glute strength one side at a time.", "lunge",
            &["Quadriceps", "Glutes"], Intermediate, &["Dumbbells (optional)"]),
        exercise("ex007", "Pull-up", "Develops upper back and arm strength.", "pullup",
            &["Back", "Biceps"], Advanced, &["Pull-up bar"]),
        exercise("ex008", "Dumbbell Biceps Curl", "Focused biceps strengthening.", "bicepcurl",
            &["Biceps"], Beginner, &["Dumbbells"]),
        exercise("ex009", "Overhead Triceps Extension", "Works the triceps for defined arms.", "tricepext",
            &["Triceps"], Intermediate, &["Dumbbell", "EZ bar"]),
        exercise("ex010", "Lateral Raise", "Develops the side of the shoulders.", "latraise",
            &["Shoulders"], Beginner, &["Dumbbells"]),
    ]
}
