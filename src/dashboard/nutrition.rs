//! Nutrition panel: plan history plus the daily food log

use super::plans::{PlanPanel, PlanPanelSnapshot};
use super::{PanelError, PanelResult};
use crate::models::{FoodLogEntry, NutritionPlan};
use crate::store::LocalStore;
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use std::ops::{Deref, DerefMut};

pub const FOOD_LOG_KEY: &str = "food_log";

/// Upper bound for a single logged meal
pub const MAX_MEAL_CALORIES: u32 = 10_000;

/// Entries for one day, newest first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFoodLog {
    pub date: NaiveDate,
    pub entries: Vec<FoodLogEntry>,
    pub total_calories: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSnapshot {
    #[serde(flatten)]
    pub plans: PlanPanelSnapshot<NutritionPlan>,
    pub today: DailyFoodLog,
}

pub struct NutritionPanel {
    plans: PlanPanel<NutritionPlan>,
    store: LocalStore,
    user_id: String,
    food_log: Vec<FoodLogEntry>,
}

impl NutritionPanel {
    pub fn load(store: LocalStore, user_id: &str) -> Self {
        let food_log = store
            .load::<Vec<FoodLogEntry>>(FOOD_LOG_KEY, Some(user_id))
            .unwrap_or_default();

        Self {
            plans: PlanPanel::load(store.clone(), user_id),
            store,
            user_id: user_id.to_string(),
            food_log,
        }
    }

    pub fn food_log(&self) -> &[FoodLogEntry] {
        &self.food_log
    }

    /// Record a meal eaten now
    pub fn log_food(&mut self, name: &str, calories: i64) -> PanelResult<&FoodLogEntry> {
        let now = Local::now();
        self.log_food_at(name, calories, now.date_naive(), now.format("%H:%M").to_string())
    }

    fn log_food_at(&mut self, name: &str, calories: i64, date: NaiveDate, time: String) -> PanelResult<&FoodLogEntry> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PanelError::Validation(
                "Fill in the meal name and calories.".to_string(),
            ));
        }
        let calories = u32::try_from(calories)
            .ok()
            .filter(|c| (1..=MAX_MEAL_CALORIES).contains(c))
            .ok_or_else(|| PanelError::Validation("Please enter a valid calorie value.".to_string()))?;

        let entry = FoodLogEntry {
            id: self.next_entry_id(),
            name: name.to_string(),
            calories,
            time,
            date,
        };
        self.food_log.insert(0, entry);
        self.persist_food_log();

        tracing::debug!(user_id = %self.user_id, calories, "Logged meal");
        Ok(&self.food_log[0])
    }

    pub fn remove_food(&mut self, id: &str) -> PanelResult<()> {
        let before = self.food_log.len();
        self.food_log.retain(|e| e.id != id);
        if self.food_log.len() == before {
            return Err(PanelError::NotFound(format!("food log entry '{}'", id)));
        }
        self.persist_food_log();
        Ok(())
    }

    pub fn day(&self, date: NaiveDate) -> DailyFoodLog {
        let entries: Vec<FoodLogEntry> =
            self.food_log.iter().filter(|e| e.date == date).cloned().collect();
        let total_calories = entries.iter().map(|e| u64::from(e.calories)).sum();
        DailyFoodLog {
            date,
            entries,
            total_calories,
        }
    }

    pub fn today(&self) -> DailyFoodLog {
        self.day(Local::now().date_naive())
    }

    pub fn snapshot(&self, action: Option<&str>) -> NutritionSnapshot {
        NutritionSnapshot {
            plans: self.plans.snapshot(action),
            today: self.today(),
        }
    }

    /// Millisecond timestamp, bumped if two meals land in the same millisecond
    fn next_entry_id(&self) -> String {
        let mut stamp = Utc::now().timestamp_millis();
        while self.food_log.iter().any(|e| e.id == stamp.to_string()) {
            stamp += 1;
        }
        stamp.to_string()
    }

    fn persist_food_log(&self) {
        if self.plans.is_loading() {
            return;
        }
        self.store.save(FOOD_LOG_KEY, &self.food_log, Some(&self.user_id));
    }
}

impl Deref for NutritionPanel {
    type Target = PlanPanel<NutritionPlan>;

    fn deref(&self) -> &Self::Target {
        &self.plans
    }
}

impl DerefMut for NutritionPanel {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.plans
    }
}
