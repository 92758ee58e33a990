use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Prefix applied to every cache key so unrelated data sharing the same
/// storage area is never touched.
pub const CACHE_PREFIX: &str = "atmosvibe-cache:";

/// Absolute age after which the periodic sweep drops an entry. Numerically
/// equal to the per-fetch TTL, but a separate policy with its own trigger.
pub const SWEEP_EXPIRY_MS: i64 = 30 * 60 * 1000;

/// Injected persistence capability. All implementations are best-effort:
/// storage failures surface as misses, never as errors.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn keys(&self) -> Vec<String>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.remove(key);
        }
    }

    fn keys(&self) -> Vec<String> {
        match self.data.lock() {
            Ok(data) => data.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Disk-backed store: one JSON document holding the whole key space,
/// rewritten on every mutation. Stands in for the browser's localStorage.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: &Path) -> Self {
        let data = std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            data: Mutex::new(data),
        }
    }

    fn persist(&self, data: &HashMap<String, String>) {
        // A failed write (quota, permissions) only costs us a cache entry.
        if let Ok(raw) = serde_json::to_string(data) {
            let _ = std::fs::write(&self.path, raw);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.insert(key.to_string(), value.to_string());
            self.persist(&data);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut data) = self.data.lock() {
            data.remove(key);
            self.persist(&data);
        }
    }

    fn keys(&self) -> Vec<String> {
        match self.data.lock() {
            Ok(data) => data.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }
}

/// Timestamped envelope written for every cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub ts: i64,
}

/// Namespaced, typed view over a [`KeyValueStore`]. Serialization failures
/// and storage failures both degrade to cache misses.
#[derive(Debug)]
pub struct CacheStore<S> {
    store: S,
}

impl<S: KeyValueStore> CacheStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<CacheEntry<T>> {
        let raw = self.store.get(&format!("{CACHE_PREFIX}{key}"))?;
        serde_json::from_str(&raw).ok()
    }

    pub fn set<T: Serialize>(&self, key: &str, data: &T) {
        self.set_at(key, data, chrono::Utc::now().timestamp_millis());
    }

    pub fn set_at<T: Serialize>(&self, key: &str, data: &T, ts: i64) {
        if let Ok(raw) = serde_json::to_string(&CacheEntry { data, ts }) {
            self.store.set(&format!("{CACHE_PREFIX}{key}"), &raw);
        }
    }

    pub fn clear(&self) {
        for key in self.store.keys() {
            if key.starts_with(CACHE_PREFIX) {
                self.store.remove(&key);
            }
        }
    }

    /// Drops every namespaced entry older than [`SWEEP_EXPIRY_MS`]. Invoked
    /// from maintenance paths, not from reads.
    pub fn clear_expired(&self) {
        let now = chrono::Utc::now().timestamp_millis();
        for key in self.store.keys() {
            if !key.starts_with(CACHE_PREFIX) {
                continue;
            }
            let Some(raw) = self.store.get(&key) else {
                continue;
            };
            match serde_json::from_str::<CacheEntry<serde_json::Value>>(&raw) {
                Ok(entry) if now - entry.ts > SWEEP_EXPIRY_MS => self.store.remove(&key),
                _ => {}
            }
        }
    }
}
