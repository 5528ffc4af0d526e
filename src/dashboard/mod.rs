//! Dashboard panels
//!
//! Each panel owns one slice of a user's state and mirrors it to the
//! [`LocalStore`](crate::store::LocalStore) under the user's namespace:
//!
//! - [`WorkoutPanel`] and the plan half of [`NutritionPanel`] keep a current
//!   plan plus a saved history
//! - [`NutritionPanel`] also keeps the food log
//! - [`ProgressPanel`] keeps metric series and body scans
//! - [`profile`] edits the signed-in user's profile
//! - [`overview`] assembles the landing card

pub mod nutrition;
pub mod overview;
pub mod plans;
pub mod profile;
pub mod progress;
pub mod view;

pub use nutrition::{DailyFoodLog, NutritionPanel, NutritionSnapshot};
pub use overview::{build_overview, Overview, Suggestion};
pub use plans::{PlanPanel, PlanPanelSnapshot, PlanRecord, WorkoutPanel};
pub use profile::ProfileForm;
pub use progress::{BodyScanInput, BodyScanResult, ProgressPanel, ProgressSnapshot};
pub use view::{derive_view, PanelKind, ViewMode};

use crate::plans::PlanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Export failed: {0}")]
    Export(String),
}

pub type PanelResult<T> = Result<T, PanelError>;
