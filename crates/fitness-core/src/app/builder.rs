//! Builder for configuring FitnessApp initialization.

use super::state::AppState;
use super::FitnessApp;
use crate::config::{ContentSource, NetworkConfig};
use crate::content::ContentLoader;
use crate::host::{IdentityAdapter, MiniAppHost};
use crate::storage::{KeyValueStore, LocalStore};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring FitnessApp initialization.
///
/// # Example
///
/// ```rust,ignore
/// use fitness_core::FitnessApp;
///
/// let mut app = FitnessApp::builder()
///     .host(host)
///     .local_store_path("./fitness-data.json")
///     .build()?;
/// let screen = app.start().await;
/// ```
pub struct FitnessAppBuilder {
    host: Option<Arc<dyn MiniAppHost>>,
    local_store: Option<Arc<LocalStore>>,
    local_store_path: Option<PathBuf>,
    content_source: ContentSource,
    cache_ttl: Duration,
}

impl FitnessAppBuilder {
    pub fn new() -> Self {
        Self {
            host: None,
            local_store: None,
            local_store_path: None,
            content_source: ContentSource::default(),
            cache_ttl: NetworkConfig::CONTENT_CACHE_TTL,
        }
    }

    /// Attach the mini app host bridge.
    ///
    /// Default: none (the app runs detached, on the local store)
    pub fn host(mut self, host: Arc<dyn MiniAppHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Use an existing local store as the storage fallback.
    pub fn local_store(mut self, store: Arc<LocalStore>) -> Self {
        self.local_store = Some(store);
        self
    }

    /// Persist the local fallback store to a JSON file at `path`.
    ///
    /// Ignored when [`local_store`](Self::local_store) is set.
    /// Default: in-memory
    pub fn local_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_store_path = Some(path.into());
        self
    }

    /// Repository the content catalog is read from.
    pub fn content_source(mut self, source: ContentSource) -> Self {
        self.content_source = source;
        self
    }

    /// TTL of the content loader's path cache.
    ///
    /// Default: 5 minutes
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Build the app: identity adapter, then key/value store, then loader.
    pub fn build(self) -> Result<FitnessApp> {
        let identity = IdentityAdapter::new(self.host);

        let local = match (self.local_store, self.local_store_path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(LocalStore::open(path)?),
            (None, None) => Arc::new(LocalStore::in_memory()),
        };
        let storage = KeyValueStore::new(&identity, local);
        let loader = ContentLoader::with_ttl(self.content_source, self.cache_ttl)?;

        Ok(FitnessApp {
            identity,
            storage,
            loader,
            state: AppState::default(),
        })
    }
}

impl Default for FitnessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
