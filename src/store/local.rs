//! Namespaced JSON store
//!
//! Every logical key is written as `{app_prefix}{user_id}_{key}`, with
//! `guest` standing in for an absent user. Reads that fail (missing key,
//! backend error, unparsable JSON) return `None`; writes and deletes that
//! fail are logged. Neither ever propagates an error to the caller.

use crate::store::backend::KeyValueBackend;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;

/// Prefix shared by every key this application writes
pub const DEFAULT_APP_PREFIX: &str = "fitlife_ai_";

/// Namespace used when no user is signed in
pub const GUEST_NAMESPACE: &str = "guest";

/// Per-user namespaced JSON store
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn KeyValueBackend>,
    app_prefix: String,
}

impl LocalStore {
    /// Create a store over `backend` using the default app prefix
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self::with_prefix(backend, DEFAULT_APP_PREFIX)
    }

    pub fn with_prefix(backend: Arc<dyn KeyValueBackend>, app_prefix: impl Into<String>) -> Self {
        Self {
            backend,
            app_prefix: app_prefix.into(),
        }
    }

    /// The underlying backend
    pub fn backend(&self) -> &Arc<dyn KeyValueBackend> {
        &self.backend
    }

    pub fn app_prefix(&self) -> &str {
        &self.app_prefix
    }

    /// Build the physical key for `key` in `user_id`'s namespace
    pub fn storage_key(&self, key: &str, user_id: Option<&str>) -> String {
        format!("{}{}", self.namespace_prefix(user_id), key)
    }

    /// Prefix shared by every key in `user_id`'s namespace
    pub fn namespace_prefix(&self, user_id: Option<&str>) -> String {
        format!("{}{}_", self.app_prefix, namespace(user_id))
    }

    /// Load and deserialize the value stored under `key`
    pub fn load<T: DeserializeOwned>(&self, key: &str, user_id: Option<&str>) -> Option<T> {
        let storage_key = self.storage_key(key, user_id);

        let raw = match self.backend.get(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    user = %namespace(user_id),
                    error = %e,
                    "Error reading stored value"
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    user = %namespace(user_id),
                    error = %e,
                    "Error parsing stored value"
                );
                None
            }
        }
    }

    /// Serialize `value` and write it under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T, user_id: Option<&str>) {
        let serialized = match serde_json::to_string(value) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    user = %namespace(user_id),
                    error = %e,
                    "Error serializing value for storage"
                );
                return;
            }
        };

        if let Err(e) = self.backend.set(&self.storage_key(key, user_id), serialized) {
            tracing::warn!(
                key = %key,
                user = %namespace(user_id),
                error = %e,
                "Error writing stored value"
            );
        }
    }

    /// Delete the value stored under `key`
    pub fn remove(&self, key: &str, user_id: Option<&str>) {
        if let Err(e) = self.backend.remove(&self.storage_key(key, user_id)) {
            tracing::warn!(
                key = %key,
                user = %namespace(user_id),
                error = %e,
                "Error removing stored value"
            );
        }
    }

    /// Delete every key in `user_id`'s namespace, returning how many were removed
    pub fn clear_user(&self, user_id: Option<&str>) -> usize {
        let prefix = self.namespace_prefix(user_id);
        let keys = match self.backend.keys_with_prefix(&prefix) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(user = %namespace(user_id), error = %e, "Error listing namespace");
                return 0;
            }
        };

        let mut removed = 0;
        for key in keys {
            match self.backend.remove(&key) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(key = %key, error = %e, "Error removing stored value"),
            }
        }
        removed
    }
}

/// Namespace segment for `user_id`; empty ids fall back to the guest namespace
fn namespace(user_id: Option<&str>) -> &str {
    match user_id {
        Some(id) if !id.is_empty() => id,
        _ => GUEST_NAMESPACE,
    }
}
