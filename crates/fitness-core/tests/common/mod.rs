//! Shared helpers for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use fitness_core::{CloudStorageApi, ContentSource, HostUser, MiniAppHost, StorageCallback};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OWNER: &str = "acme";
pub const REPO: &str = "fitness-content";

/// Content source whose raw and listing hosts are both `server`.
pub fn mock_source(server: &MockServer) -> ContentSource {
    ContentSource::new(OWNER, REPO).with_base_urls(server.uri(), server.uri())
}

/// Request path of a raw file on the default branch.
pub fn raw_path(file: &str) -> String {
    format!("/{}/{}/main/{}", OWNER, REPO, file)
}

/// Request path of a directory listing.
pub fn listing_path(directory: &str) -> String {
    format!("/repos/{}/{}/contents/{}", OWNER, REPO, directory)
}

/// Serve `body` for a raw file, expecting exactly `hits` requests.
pub async fn mount_file(server: &MockServer, file: &str, body: Value, hits: u64) {
    Mock::given(method("GET"))
        .and(path(raw_path(file)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(hits)
        .mount(server)
        .await;
}

/// Serve a directory listing containing `files`.
pub async fn mount_listing(server: &MockServer, directory: &str, files: &[&str]) {
    let entries: Vec<Value> = files
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "path": format!("{}/{}", directory, name),
                "size": 64,
                "download_url": null,
                "type": "file"
            })
        })
        .collect();
    Mock::given(method("GET"))
        .and(path(listing_path(directory)))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(entries)))
        .mount(server)
        .await;
}

/// In-memory cloud storage that completes every callback inline.
#[derive(Default)]
pub struct MemoryCloud {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryCloud {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }
}

impl CloudStorageApi for MemoryCloud {
    fn set_item(&self, key: &str, value: &str, callback: StorageCallback<bool>) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        callback(Ok(true));
    }

    fn get_item(&self, key: &str, callback: StorageCallback<Option<String>>) {
        let value = self.items.lock().unwrap().get(key).cloned();
        callback(Ok(Some(value.unwrap_or_default())));
    }

    fn remove_item(&self, key: &str, callback: StorageCallback<bool>) {
        self.items.lock().unwrap().remove(key);
        callback(Ok(true));
    }

    fn get_keys(&self, callback: StorageCallback<Vec<String>>) {
        let keys = self.items.lock().unwrap().keys().cloned().collect();
        callback(Ok(keys));
    }
}

/// Minimal host with cloud storage and a scripted confirm answer.
pub struct TestHost {
    pub cloud: Arc<MemoryCloud>,
    pub confirm_answer: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl TestHost {
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            cloud: Arc::new(MemoryCloud::default()),
            confirm_answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl MiniAppHost for TestHost {
    fn platform(&self) -> String {
        "test".to_string()
    }

    fn version(&self) -> String {
        "7.10".to_string()
    }

    fn user(&self) -> Option<HostUser> {
        Some(HostUser {
            id: 42,
            first_name: "Sam".to_string(),
            last_name: None,
            username: Some("sam".to_string()),
            language_code: Some("en".to_string()),
        })
    }

    fn set_header_color(&self, _color: &str) {}

    fn set_background_color(&self, _color: &str) {}

    fn expand(&self) {}

    fn show_alert(&self, _message: &str) {}

    async fn show_confirm(&self, message: &str) -> bool {
        self.prompts.lock().unwrap().push(message.to_string());
        self.confirm_answer
    }

    fn send_data(&self, _data: &str) {}

    fn close(&self) {}

    fn cloud_storage(&self) -> Option<Arc<dyn CloudStorageApi>> {
        Some(self.cloud.clone() as Arc<dyn CloudStorageApi>)
    }
}
