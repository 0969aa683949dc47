//! Host cloud storage backend.
//!
//! The host API takes a completion callback per call; each call is turned
//! into a future that resolves on the first completion.

use super::backend::{BackendKind, StorageBackend};
use crate::host::{CloudStorageApi, StorageCallback};
use crate::{FitnessError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Run one callback-style host call and await its completion.
///
/// A host that drops the callback without invoking it rejects the future.
pub(crate) async fn callback_to_future<T, F>(register: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(StorageCallback<T>),
{
    let (tx, rx) = oneshot::channel();
    register(Box::new(move |result| {
        // The receiver may be gone if the caller stopped waiting.
        let _ = tx.send(result);
    }));

    match rx.await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(message)) => Err(FitnessError::storage(BackendKind::Cloud.as_str(), message)),
        Err(_) => Err(FitnessError::storage(
            BackendKind::Cloud.as_str(),
            "callback dropped without a result",
        )),
    }
}

/// Backend over the host's cloud key/value API.
pub struct CloudBackend {
    api: Arc<dyn CloudStorageApi>,
}

impl CloudBackend {
    pub fn new(api: Arc<dyn CloudStorageApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl StorageBackend for CloudBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Cloud
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = callback_to_future(|cb| self.api.get_item(key, cb)).await?;
        // Hosts report a missing key as an empty string.
        Ok(value.filter(|v| !v.is_empty()))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let stored = callback_to_future(|cb| self.api.set_item(key, value, cb)).await?;
        if stored {
            Ok(())
        } else {
            Err(FitnessError::storage(
                BackendKind::Cloud.as_str(),
                format!("host refused to store {}", key),
            ))
        }
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        callback_to_future(|cb| self.api.remove_item(key, cb)).await?;
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        callback_to_future(|cb| self.api.get_keys(cb)).await
    }
}
