//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::ai::AiService;
use crate::catalog;
use crate::chat::ChatRegistry;
use crate::community::CommunityBoard;
use crate::config::Config;
use crate::dashboard::{NutritionPanel, ProgressPanel, WorkoutPanel};
use crate::models::Exercise;
use crate::session::AuthStore;
use crate::store::LocalStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Namespaced store every panel reads and writes
    pub store: LocalStore,
    /// Bearer-token sessions
    pub auth: Arc<AuthStore>,
    /// Text service, online or offline
    pub ai: AiService,
    /// Coach chat sessions per user
    pub chats: Arc<ChatRegistry>,
    /// Shared community board
    pub community: Arc<CommunityBoard>,
    /// Exercise library used to enrich workout plans
    pub library: Arc<Vec<Exercise>>,
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: LocalStore, ai: AiService, config: Config) -> Self {
        let auth = AuthStore::new(store.clone(), config.auth.clone());
        let chats = ChatRegistry::new(ai.response_language());

        Self {
            store,
            auth: Arc::new(auth),
            ai,
            chats: Arc::new(chats),
            community: Arc::new(CommunityBoard::new()),
            library: Arc::new(catalog::exercise_library()),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn workouts(&self, user_id: &str) -> WorkoutPanel {
        WorkoutPanel::load(self.store.clone(), user_id)
    }

    pub fn nutrition(&self, user_id: &str) -> NutritionPanel {
        NutritionPanel::load(self.store.clone(), user_id)
    }

    pub fn progress(&self, user_id: &str) -> ProgressPanel {
        ProgressPanel::load(self.store.clone(), user_id)
    }

    /// Simulated latency when reopening a saved plan
    pub fn history_delay(&self) -> Duration {
        Duration::from_millis(self.config.auth.history_load_delay_ms)
    }

    /// Socket address string for the listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.api.host, self.config.api.port)
    }
}
