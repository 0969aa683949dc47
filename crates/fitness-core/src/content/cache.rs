//! Per-path TTL cache for fetched JSON documents.

use crate::config::NetworkConfig;
use mini_moka::sync::Cache;
use serde_json::Value;
use std::time::Duration;

/// Parsed documents keyed by request path.
///
/// An entry is served while it is younger than the TTL. Nothing invalidates
/// entries early except [`clear`](Self::clear).
#[derive(Clone)]
pub struct PathCache {
    entries: Cache<String, Value>,
    ttl: Duration,
}

impl PathCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(NetworkConfig::CONTENT_CACHE_CAPACITY)
                .build(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, path: &str) -> Option<Value> {
        self.entries.get(&path.to_string())
    }

    pub fn insert(&self, path: &str, data: Value) {
        self.entries.insert(path.to_string(), data);
    }

    /// Drop every entry; subsequent reads miss immediately.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for PathCache {
    fn default() -> Self {
        Self::new(NetworkConfig::CONTENT_CACHE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_within_ttl() {
        let cache = PathCache::default();
        assert_eq!(cache.ttl(), NetworkConfig::CONTENT_CACHE_TTL);
        cache.insert("version.json", json!({"version": "1.0.0"}));
        assert_eq!(cache.get("version.json"), Some(json!({"version": "1.0.0"})));
        assert_eq!(cache.get("other.json"), None);
    }

    #[test]
    fn test_expires_after_ttl() {
        let cache = PathCache::new(Duration::from_millis(50));
        cache.insert("version.json", json!({"version": "1.0.0"}));
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get("version.json"), None);
    }

    #[test]
    fn test_clear_is_immediate() {
        let cache = PathCache::default();
        cache.insert("exercises/index.json", json!({"exercises": []}));
        cache.clear();
        assert_eq!(cache.get("exercises/index.json"), None);
    }
}
