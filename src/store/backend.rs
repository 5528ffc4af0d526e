//! Key-value backends
//!
//! Raw string storage underneath [`LocalStore`](crate::store::LocalStore).
//!
//! - [`MemoryBackend`]: process-local map, optionally bounded by a byte quota
//!   the way browser storage is
//! - [`SqliteBackend`]: single-table SQLite file that survives restarts

use crate::store::error::{StorageError, StorageResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, RwLock};

/// Raw string key-value storage
pub trait KeyValueBackend: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: String) -> StorageResult<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// List every key starting with `prefix`
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Bytes currently held (keys plus values)
    fn usage_bytes(&self) -> StorageResult<usize>;

    /// Short backend name for health reporting
    fn name(&self) -> &'static str;
}

fn entry_size(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

fn check_quota(
    quota: Option<usize>,
    current: usize,
    replaced: usize,
    incoming: usize,
) -> StorageResult<()> {
    if let Some(quota) = quota {
        let requested = current.saturating_sub(replaced) + incoming;
        if requested > quota {
            return Err(StorageError::QuotaExceeded { requested, quota });
        }
    }
    Ok(())
}

// ============================================
// Memory backend
// ============================================

/// In-memory backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that rejects writes once `quota_bytes` would be exceeded
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        let current: usize = entries.iter().map(|(k, v)| entry_size(k, v)).sum();
        let replaced = entries.get(key).map(|v| entry_size(key, v)).unwrap_or(0);
        check_quota(self.quota_bytes, current, replaced, entry_size(key, &value))?;

        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    fn usage_bytes(&self) -> StorageResult<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(entries.iter().map(|(k, v)| entry_size(k, v)).sum())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// ============================================
// SQLite backend
// ============================================

/// SQLite-backed store: one `kv` table, one row per namespaced key
pub struct SqliteBackend {
    conn: Mutex<Connection>,
    quota_bytes: Option<usize>,
}

impl SqliteBackend {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Apply a byte quota to subsequent writes
    pub fn quota(mut self, quota_bytes: Option<usize>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
            quota_bytes: None,
        })
    }

    fn lock(&self) -> StorageResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| StorageError::Lock(e.to_string()))
    }

    fn usage_locked(conn: &Connection) -> StorageResult<usize> {
        let total: i64 = conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0) FROM kv",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(total).unwrap_or(0))
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: String) -> StorageResult<()> {
        let conn = self.lock()?;

        if self.quota_bytes.is_some() {
            let current = Self::usage_locked(&conn)?;
            let replaced: Option<String> = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            let replaced = replaced.map(|v| entry_size(key, &v)).unwrap_or(0);
            check_quota(self.quota_bytes, current, replaced, entry_size(key, &value))?;
        }

        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn usage_bytes(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        Self::usage_locked(&conn)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
