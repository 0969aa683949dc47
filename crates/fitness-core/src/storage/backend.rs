//! Storage backend trait.

use crate::Result;
use async_trait::async_trait;

/// Which backend a store ended up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The host's cloud key/value API.
    Cloud,
    /// The local fallback store.
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Cloud => "cloud",
            BackendKind::Local => "local",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw string key/value storage.
///
/// Backends report failures as errors; the store above them decides how to
/// degrade.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Read a raw value. `None` means the key is absent.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    async fn remove_item(&self, key: &str) -> Result<()>;

    /// All keys visible to this app, without any namespacing prefix.
    async fn keys(&self) -> Result<Vec<String>>;
}
