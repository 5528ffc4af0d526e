//! # FitLife
//!
//! AI fitness and nutrition coaching as a Rust service: per-user plan
//! storage, dashboard panels, a coaching chat and a small community board,
//! all served over a JSON API.
//!
//! ## Modules
//!
//! - [`store`]: Namespaced key-value persistence (memory or SQLite)
//! - [`session`]: Registration, login and the session mirror
//! - [`ai`]: Generative text client, JSON reply parsing and offline fallbacks
//! - [`plans`]: Workout and nutrition plan generation
//! - [`dashboard`]: Plan history, food log, progress and profile panels
//! - [`chat`]: Per-user coaching conversations
//! - [`community`]: Posts and challenges
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Streaming chat over WebSocket
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fitlife::ai::AiService;
//! use fitlife::store::{LocalStore, MemoryBackend};
//! use fitlife::{serve, AppState, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = LocalStore::new(Arc::new(MemoryBackend::new()));
//!     let ai = AiService::from_config(&config.ai);
//!
//!     serve(AppState::new(store, ai, config)).await?;
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod api;
pub mod catalog;
pub mod chat;
pub mod community;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod navigation;
pub mod plans;
pub mod session;
pub mod store;
pub mod websocket;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError};

pub use store::{KeyValueBackend, LocalStore, MemoryBackend, SqliteBackend, StorageError};

pub use session::{AuthError, AuthStore};

pub use chat::{ChatRegistry, ChatSession};

pub use community::CommunityBoard;

pub use dashboard::{PanelError, ViewMode};
