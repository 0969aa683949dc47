//! User data storage.
//!
//! [`KeyValueStore`] persists JSON values under string keys. It writes to the
//! host's cloud storage when the host offers it and to a local store
//! otherwise; callers never see which. Reads go through an in-process cache
//! that is authoritative once populated.
//!
//! Failures degrade instead of propagating: `get` falls back to the supplied
//! default and `set` reports `false`. Only `remove` returns the backend error.

mod atomic;
mod backend;
mod cloud;
mod local;

pub use backend::{BackendKind, StorageBackend};
pub use cloud::CloudBackend;
pub use local::{LocalBackend, LocalStore};

use crate::host::IdentityAdapter;
use crate::Result;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

/// JSON key/value store over the cloud or local backend.
pub struct KeyValueStore {
    backend: Box<dyn StorageBackend>,
    /// Never expires and is never re-synced with the backend.
    cache: RwLock<HashMap<String, Value>>,
}

impl KeyValueStore {
    /// Pick the backend: host cloud storage if available, else `local`.
    pub fn new(identity: &IdentityAdapter, local: Arc<LocalStore>) -> Self {
        let backend: Box<dyn StorageBackend> = match identity.cloud_storage() {
            Some(api) => Box::new(CloudBackend::new(api)),
            None => Box::new(LocalBackend::new(local)),
        };
        info!(
            backend = %backend.kind(),
            user_id = ?identity.user().map(|u| u.id),
            "Key/value store initialized"
        );
        Self::with_backend(backend)
    }

    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Store `value` under `key`.
    ///
    /// Strings are stored raw, everything else as JSON. Note that a string
    /// which itself looks like JSON (`"42"`) reads back parsed once the
    /// cache is gone.
    pub async fn set(&self, key: &str, value: &Value) -> bool {
        let raw = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        match self.backend.set_item(key, &raw).await {
            Ok(()) => {
                self.cache.write().await.insert(key.to_string(), value.clone());
                true
            }
            Err(e) => {
                error!("Failed to save {}: {}", key, e);
                false
            }
        }
    }

    /// Typed [`set`](Self::set).
    pub async fn set_as<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_value(value) {
            Ok(value) => self.set(key, &value).await,
            Err(e) => {
                error!("Failed to serialize {}: {}", key, e);
                false
            }
        }
    }

    /// Read `key`, returning `default` when it is absent or unreadable.
    pub async fn get(&self, key: &str, default: Value) -> Value {
        if let Some(value) = self.cache.read().await.get(key) {
            return value.clone();
        }

        let raw = match self.backend.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                error!("Failed to load {}: {}", key, e);
                return default;
            }
        };

        let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        self.cache.write().await.insert(key.to_string(), value.clone());
        value
    }

    /// Typed [`get`](Self::get); a stored value of the wrong shape yields
    /// `default`.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.get(key, Value::Null).await {
            Value::Null => default,
            value => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Stored {} has an unexpected shape, using default: {}", key, e);
                default
            }),
        }
    }

    /// Delete `key` from the backend and the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove_item(key).await?;
        self.cache.write().await.remove(key);
        Ok(())
    }

    /// All stored keys; empty if the backend can't list them.
    pub async fn keys(&self) -> Vec<String> {
        match self.backend.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list storage keys: {}", e);
                Vec::new()
            }
        }
    }

    /// Every stored key with its value.
    pub async fn export_all(&self) -> Map<String, Value> {
        let mut data = Map::new();
        for key in self.keys().await {
            let value = self.get(&key, Value::Null).await;
            data.insert(key, value);
        }
        data
    }

    /// Write every entry of `data`; `true` only if all writes succeeded.
    pub async fn import_all(&self, data: Map<String, Value>) -> bool {
        let mut all_ok = true;
        for (key, value) in data {
            all_ok &= self.set(&key, &value).await;
        }
        all_ok
    }

    /// Forget cached values so the next reads hit the backend.
    pub async fn clear_cache(&self) {
        let mut cache = self.cache.write().await;
        debug!("Dropping {} cached storage entries", cache.len());
        cache.clear();
    }
}
