//! Local persistence
//!
//! Namespaced JSON key-value storage. Every dashboard panel and the session
//! mirror persist through [`LocalStore`].
//!
//! # Example
//!
//! ```rust
//! use fitlife::store::{LocalStore, MemoryBackend};
//! use std::sync::Arc;
//!
//! let store = LocalStore::new(Arc::new(MemoryBackend::new()));
//! store.save("food_log", &vec!["oats"], Some("user-1"));
//!
//! let log: Option<Vec<String>> = store.load("food_log", Some("user-1"));
//! assert_eq!(log, Some(vec!["oats".to_string()]));
//!
//! // Other users (and guests) never see it
//! assert_eq!(store.load::<Vec<String>>("food_log", None), None);
//! ```

pub mod backend;
pub mod error;
pub mod local;

pub use backend::{KeyValueBackend, MemoryBackend, SqliteBackend};
pub use error::{StorageError, StorageResult};
pub use local::{LocalStore, DEFAULT_APP_PREFIX, GUEST_NAMESPACE};
