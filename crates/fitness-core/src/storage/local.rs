//! Local fallback storage.
//!
//! [`LocalStore`] is a flat string map shared by everything on the device,
//! optionally persisted to a JSON file. [`LocalBackend`] carves the app's
//! namespace out of it with a key prefix.

use super::atomic::{atomic_read_json, atomic_write_json};
use super::backend::{BackendKind, StorageBackend};
use crate::config::StorageConfig;
use crate::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Device-local string map.
pub struct LocalStore {
    path: Option<PathBuf>,
    items: RwLock<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open a file-backed store, loading existing entries if the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let items: BTreeMap<String, String> = atomic_read_json(&path)?.unwrap_or_default();
        debug!("Opened local store {} ({} entries)", path.display(), items.len());
        Ok(Self {
            path: Some(path),
            items: RwLock::new(items),
        })
    }

    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            items: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.update(|items| {
            items.remove(key);
        })
    }

    /// Every key in the store, across all namespaces.
    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.items.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `change` and persist; the in-memory map only changes if the
    /// write succeeded.
    fn update(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut items = self
            .items
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = items.clone();
        change(&mut next);
        if let Some(path) = &self.path {
            atomic_write_json(path, &next)?;
        }
        *items = next;
        Ok(())
    }
}

/// Backend over a [`LocalStore`], namespaced by a key prefix.
pub struct LocalBackend {
    store: Arc<LocalStore>,
    prefix: String,
}

impl LocalBackend {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self::with_prefix(store, StorageConfig::LOCAL_KEY_PREFIX)
    }

    pub fn with_prefix(store: Arc<LocalStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .store
            .get(&self.namespaced(key))
            .filter(|v| !v.is_empty()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.store.set(&self.namespaced(key), value)
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.store.remove(&self.namespaced(key))
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .keys()
            .into_iter()
            .filter_map(|key| key.strip_prefix(&self.prefix).map(str::to_string))
            .collect())
    }
}
