//! In-memory host bridge for unit tests.

use super::{CloudStorageApi, HapticStyle, HostUser, MiniAppHost, StorageCallback};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Cloud storage double. Callbacks run on a separate thread when `deferred`.
#[derive(Default)]
pub(crate) struct FakeCloudStorage {
    items: Mutex<BTreeMap<String, String>>,
    pub(crate) fail: AtomicBool,
    pub(crate) drop_callbacks: AtomicBool,
    pub(crate) deferred: AtomicBool,
    pub(crate) reads: AtomicUsize,
}

impl FakeCloudStorage {
    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub(crate) fn put_raw(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn complete<T: Send + 'static>(&self, callback: StorageCallback<T>, result: Result<T, String>) {
        if self.drop_callbacks.load(Ordering::SeqCst) {
            drop(callback);
            return;
        }
        let result = if self.fail.load(Ordering::SeqCst) {
            Err("STORAGE_UNAVAILABLE".to_string())
        } else {
            result
        };
        if self.deferred.load(Ordering::SeqCst) {
            std::thread::spawn(move || callback(result));
        } else {
            callback(result);
        }
    }
}

impl CloudStorageApi for FakeCloudStorage {
    fn set_item(&self, key: &str, value: &str, callback: StorageCallback<bool>) {
        if !self.fail.load(Ordering::SeqCst) {
            self.put_raw(key, value);
        }
        self.complete(callback, Ok(true));
    }

    fn get_item(&self, key: &str, callback: StorageCallback<Option<String>>) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let value = Some(self.raw(key).unwrap_or_default());
        self.complete(callback, Ok(value));
    }

    fn remove_item(&self, key: &str, callback: StorageCallback<bool>) {
        if !self.fail.load(Ordering::SeqCst) {
            self.items.lock().unwrap().remove(key);
        }
        self.complete(callback, Ok(true));
    }

    fn get_keys(&self, callback: StorageCallback<Vec<String>>) {
        let keys = self.items.lock().unwrap().keys().cloned().collect();
        self.complete(callback, Ok(keys));
    }
}

/// Host double that records every bridge call as a string.
pub(crate) struct FakeHost {
    calls: Mutex<Vec<String>>,
    confirm_answer: bool,
    user: Option<HostUser>,
    cloud: Option<Arc<FakeCloudStorage>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            confirm_answer: false,
            user: Some(HostUser {
                id: 1001,
                first_name: "Alex".to_string(),
                last_name: None,
                username: Some("alex".to_string()),
                language_code: Some("en".to_string()),
            }),
            cloud: None,
        }
    }

    pub(crate) fn with_confirm_answer(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub(crate) fn with_cloud(mut self, cloud: Arc<FakeCloudStorage>) -> Self {
        self.cloud = Some(cloud);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MiniAppHost for FakeHost {
    fn platform(&self) -> String {
        "test".to_string()
    }

    fn version(&self) -> String {
        "7.0".to_string()
    }

    fn user(&self) -> Option<HostUser> {
        self.user.clone()
    }

    fn set_header_color(&self, color: &str) {
        self.record(format!("header:{}", color));
    }

    fn set_background_color(&self, color: &str) {
        self.record(format!("background:{}", color));
    }

    fn expand(&self) {
        self.record("expand".to_string());
    }

    fn disable_vertical_swipes(&self) -> bool {
        self.record("disable_swipes".to_string());
        true
    }

    fn show_alert(&self, message: &str) {
        self.record(format!("alert:{}", message));
    }

    async fn show_confirm(&self, message: &str) -> bool {
        self.record(format!("confirm:{}", message));
        self.confirm_answer
    }

    fn impact_occurred(&self, style: HapticStyle) -> Result<(), String> {
        self.record(format!("haptic:{}", style));
        Ok(())
    }

    fn send_data(&self, data: &str) {
        self.record(format!("send:{}", data));
    }

    fn close(&self) {
        self.record("close".to_string());
    }

    fn cloud_storage(&self) -> Option<Arc<dyn CloudStorageApi>> {
        self.cloud
            .clone()
            .map(|cloud| cloud as Arc<dyn CloudStorageApi>)
    }
}
