//! Current plan plus saved-plan history, persisted per user

use super::view::{derive_view, PanelKind, ViewMode};
use super::{PanelError, PanelResult};
use crate::models::{NutritionPlan, WorkoutPlan};
use crate::store::LocalStore;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// A plan type a [`PlanPanel`] can hold
pub trait PlanRecord: Clone + Serialize + DeserializeOwned {
    const KIND: PanelKind;
    const ID_PREFIX: &'static str;
    const CURRENT_KEY: &'static str;
    const SAVED_KEY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn name(&self) -> &str;
}

impl PlanRecord for WorkoutPlan {
    const KIND: PanelKind = PanelKind::Workouts;
    const ID_PREFIX: &'static str = "workout";
    const CURRENT_KEY: &'static str = "workout_current_plan";
    const SAVED_KEY: &'static str = "workout_saved_plans";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl PlanRecord for NutritionPlan {
    const KIND: PanelKind = PanelKind::Nutrition;
    const ID_PREFIX: &'static str = "nutrition";
    const CURRENT_KEY: &'static str = "nutrition_current_plan";
    const SAVED_KEY: &'static str = "nutrition_saved_plans";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// What a client needs to render the panel
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanPanelSnapshot<P> {
    pub view: Option<ViewMode>,
    pub current: Option<P>,
    pub saved: Vec<P>,
}

pub struct PlanPanel<P: PlanRecord> {
    store: LocalStore,
    user_id: String,
    current: Option<P>,
    saved: Vec<P>,
    loading: bool,
}

pub type WorkoutPanel = PlanPanel<WorkoutPlan>;

impl<P: PlanRecord> PlanPanel<P> {
    /// Read the stored current plan and history; missing data means an empty panel
    pub fn load(store: LocalStore, user_id: &str) -> Self {
        let current = store.load::<Option<P>>(P::CURRENT_KEY, Some(user_id)).flatten();
        let saved = store.load::<Vec<P>>(P::SAVED_KEY, Some(user_id)).unwrap_or_default();

        Self {
            store,
            user_id: user_id.to_string(),
            current,
            saved,
            loading: false,
        }
    }

    pub fn current(&self) -> Option<&P> {
        self.current.as_ref()
    }

    pub fn saved(&self) -> &[P] {
        &self.saved
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self, action: Option<&str>) -> Option<ViewMode> {
        derive_view(action, self.current.is_some(), self.saved.len(), self.loading, P::KIND)
    }

    pub fn snapshot(&self, action: Option<&str>) -> PlanPanelSnapshot<P> {
        PlanPanelSnapshot {
            view: self.view(action),
            current: self.current.clone(),
            saved: self.saved.clone(),
        }
    }

    /// Make a freshly generated plan current and put it at the top of the history
    pub fn accept_generated(&mut self, mut plan: P) -> &P {
        plan.set_id(format!("{}-{}", P::ID_PREFIX, Utc::now().timestamp_millis()));

        self.saved.retain(|p| p.id() != plan.id());
        self.saved.insert(0, plan.clone());
        self.current = Some(plan);
        self.persist();

        tracing::info!(user_id = %self.user_id, plan_id = %self.saved[0].id(), "Saved generated plan");
        &self.saved[0]
    }

    /// Load a saved plan as the current one after the simulated delay.
    ///
    /// The stored state is re-read once the delay ends, so plans saved by
    /// other requests in the meantime are kept.
    pub async fn select_from_history(&mut self, id: &str, delay: Duration) -> PanelResult<&P> {
        self.find_saved(id)?;

        self.loading = true;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
            self.reload();
        }
        self.loading = false;

        let plan = self.find_saved(id)?;
        self.current = Some(plan);
        self.persist();

        tracing::debug!(user_id = %self.user_id, plan_id = %id, "Loaded plan from history");
        self.current.as_ref().ok_or_else(|| PanelError::NotFound(format!("plan '{}'", id)))
    }

    /// Remove a saved plan; clears the current plan when it is the one removed
    pub fn delete_from_history(&mut self, id: &str) -> PanelResult<()> {
        let before = self.saved.len();
        self.saved.retain(|p| p.id() != id);
        if self.saved.len() == before {
            return Err(PanelError::NotFound(format!("plan '{}'", id)));
        }

        if self.current.as_ref().is_some_and(|p| p.id() == id) {
            self.current = None;
        }
        self.persist();
        Ok(())
    }

    /// Drop the current plan, keeping the history
    pub fn clear_current(&mut self) {
        self.current = None;
        self.persist();
    }

    fn find_saved(&self, id: &str) -> PanelResult<P> {
        self.saved
            .iter()
            .find(|p| p.id() == id)
            .cloned()
            .ok_or_else(|| PanelError::NotFound(format!("plan '{}'", id)))
    }

    fn reload(&mut self) {
        let fresh = Self::load(self.store.clone(), &self.user_id);
        self.current = fresh.current;
        self.saved = fresh.saved;
    }

    fn persist(&self) {
        if self.loading {
            return;
        }
        let user = Some(self.user_id.as_str());
        self.store.save(P::CURRENT_KEY, &self.current, user);
        self.store.save(P::SAVED_KEY, &self.saved, user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryBackend;
    use std::sync::Arc;

    fn store() -> LocalStore {
        LocalStore::new(Arc::new(MemoryBackend::new()))
    }

    fn plan(name: &str) -> WorkoutPlan {
        WorkoutPlan {
            id: "model-id".to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_panel_starts_in_generate() {
        let panel = WorkoutPanel::load(store(), "u1");
        assert!(panel.current().is_none());
        assert!(panel.saved().is_empty());
        assert_eq!(panel.view(None), Some(ViewMode::Generate));
    }

    #[tokio::test]
    async fn test_accept_generated_persists_and_prepends() {
        let store = store();
        let mut panel = WorkoutPanel::load(store.clone(), "u1");

        let first_id = panel.accept_generated(plan("A")).id.clone();
        assert!(first_id.starts_with("workout-"));
        tokio::time::sleep(Duration::from_millis(2)).await;
        panel.accept_generated(plan("B"));

        let reloaded = WorkoutPanel::load(store, "u1");
        assert_eq!(reloaded.current().unwrap().name, "B");
        let names: Vec<&str> = reloaded.saved().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(reloaded.view(None), Some(ViewMode::Current));
        assert_eq!(reloaded.view(Some("generate")), Some(ViewMode::Generate));
    }

    #[tokio::test]
    async fn test_select_and_delete_history() {
        let store = store();
        let mut panel = WorkoutPanel::load(store.clone(), "u1");
        let a = panel.accept_generated(plan("A")).id.clone();
        tokio::time::sleep(Duration::from_millis(2)).await;
        let b = panel.accept_generated(plan("B")).id.clone();

        let selected = panel.select_from_history(&a, Duration::ZERO).await.unwrap();
        assert_eq!(selected.name, "A");
        assert!(!panel.is_loading());

        assert!(matches!(
            panel.select_from_history("missing", Duration::ZERO).await,
            Err(PanelError::NotFound(_))
        ));

        panel.delete_from_history(&a).unwrap();
        assert!(panel.current().is_none());
        assert_eq!(panel.view(None), Some(ViewMode::History));

        panel.delete_from_history(&b).unwrap();
        assert_eq!(panel.view(None), Some(ViewMode::Generate));
        assert!(panel.delete_from_history(&b).is_err());

        let reloaded = WorkoutPanel::load(store, "u1");
        assert!(reloaded.saved().is_empty());
        assert!(reloaded.current().is_none());
    }

    #[tokio::test]
    async fn test_select_keeps_plans_saved_during_delay() {
        let store = store();
        let mut selecting = WorkoutPanel::load(store.clone(), "u1");
        let a = selecting.accept_generated(plan("A")).id.clone();

        let mut generating = WorkoutPanel::load(store.clone(), "u1");
        let (selected, _) = tokio::join!(
            selecting.select_from_history(&a, Duration::from_millis(100)),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                generating.accept_generated(plan("B")).id.clone()
            }
        );
        assert_eq!(selected.unwrap().name, "A");

        let reloaded = WorkoutPanel::load(store, "u1");
        let names: Vec<&str> = reloaded.saved().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(reloaded.current().unwrap().name, "A");
    }

    #[tokio::test]
    async fn test_select_fails_when_plan_deleted_during_delay() {
        let store = store();
        let mut selecting = WorkoutPanel::load(store.clone(), "u1");
        let a = selecting.accept_generated(plan("A")).id.clone();

        let mut deleting = WorkoutPanel::load(store.clone(), "u1");
        let (selected, deleted) = tokio::join!(
            selecting.select_from_history(&a, Duration::from_millis(100)),
            async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                deleting.delete_from_history(&a)
            }
        );
        assert!(deleted.is_ok());
        assert!(matches!(selected, Err(PanelError::NotFound(_))));
        assert!(WorkoutPanel::load(store, "u1").saved().is_empty());
    }

    #[test]
    fn test_clear_current_keeps_history() {
        let mut panel = PlanPanel::<NutritionPlan>::load(store(), "u1");
        panel.accept_generated(NutritionPlan {
            name: "N".to_string(),
            ..Default::default()
        });
        panel.clear_current();
        assert_eq!(panel.saved().len(), 1);
        assert_eq!(panel.view(None), Some(ViewMode::History));
        assert!(panel.saved()[0].id.starts_with("nutrition-"));
    }

    #[test]
    fn test_corrupt_history_loads_as_empty() {
        let store = store();
        store
            .backend()
            .set("fitlife_ai_u1_workout_saved_plans", "[{broken".to_string())
            .unwrap();
        let panel = WorkoutPanel::load(store, "u1");
        assert!(panel.saved().is_empty());
    }

    #[test]
    fn test_users_do_not_share_plans() {
        let store = store();
        WorkoutPanel::load(store.clone(), "u1").accept_generated(plan("mine"));
        assert!(WorkoutPanel::load(store, "u2").current().is_none());
    }
}
