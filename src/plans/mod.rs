//! Plan generators
//!
//! Build a prompt from a request, call the text service, parse the reply into
//! a typed plan. Offline, each generator returns a fixed mock.

pub mod content;
pub mod nutrition;
pub mod workout;

pub use content::{BodyScanSummary, ContentKind};
pub use nutrition::{generate_nutrition_plan, NutritionRequest};
pub use workout::{generate_workout_plan, WorkoutRequest};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PlanError {
    #[error("{0}")]
    InvalidRequest(String),
}
