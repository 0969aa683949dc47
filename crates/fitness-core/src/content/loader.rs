//! Remote content loader.
//!
//! Fetches the exercise/program/article catalog from a GitHub repository:
//! - raw file downloads, cached per path with a TTL
//! - index file per category, with a directory scan fallback
//! - version file for update detection
//!
//! Every public operation degrades to `None`, an empty list or a default
//! value; failures are logged and never returned.

use super::cache::PathCache;
use super::types::{
    Article, ArticleFormat, ContentCategory, ListingEntry, RepoFile, TextArticle, UpdateCheck,
    INDEX_FILE,
};
use crate::config::{AppConfig, ContentSource, NetworkConfig};
use crate::network::HttpClient;
use crate::{FitnessError, Result};
use futures::stream::{self, StreamExt};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the content repository.
pub struct ContentLoader {
    source: ContentSource,
    http: Arc<HttpClient>,
    cache: PathCache,
}

impl ContentLoader {
    /// Create a loader with the default five minute cache TTL.
    pub fn new(source: ContentSource) -> Result<Self> {
        Self::with_ttl(source, NetworkConfig::CONTENT_CACHE_TTL)
    }

    /// Create a loader with a custom cache TTL.
    pub fn with_ttl(source: ContentSource, ttl: Duration) -> Result<Self> {
        source.validate()?;
        let http = HttpClient::new()?;
        let cache = PathCache::new(ttl);
        info!(
            "Content loader for {}/{}@{} (cache TTL {:?})",
            source.owner,
            source.repo,
            source.branch,
            cache.ttl()
        );
        Ok(Self {
            source,
            http: Arc::new(http),
            cache,
        })
    }

    pub fn source(&self) -> &ContentSource {
        &self.source
    }

    /// Fetch and parse a JSON file, serving from cache while fresh.
    pub async fn fetch_json(&self, path: &str) -> Option<Value> {
        if let Some(data) = self.cache.get(path) {
            debug!("Content cache hit for {}", path);
            return Some(data);
        }

        match self.request_json(path).await {
            Ok(data) => {
                self.cache.insert(path, data.clone());
                Some(data)
            }
            Err(e) => {
                log_fetch_failure(path, &e);
                None
            }
        }
    }

    /// Fetch a file as text. Never cached.
    pub async fn fetch_text(&self, path: &str) -> Option<String> {
        match self.request_text(path).await {
            Ok(text) => Some(text),
            Err(e) => {
                log_fetch_failure(path, &e);
                None
            }
        }
    }

    /// List files in `directory`, optionally only those ending in `extension`.
    pub async fn list_files(&self, directory: &str, extension: Option<&str>) -> Vec<RepoFile> {
        let entries = match self.request_listing(directory).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to list {}: {}", directory, e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter(|entry| entry.kind == "file")
            .filter(|entry| extension.map_or(true, |ext| entry.name.ends_with(ext)))
            .map(RepoFile::from)
            .collect()
    }

    pub async fn load_all_exercises(&self) -> Vec<Value> {
        self.load_category(ContentCategory::Exercises).await
    }

    pub async fn load_all_programs(&self) -> Vec<Value> {
        self.load_category(ContentCategory::Programs).await
    }

    /// Remote content version, or the default when `version.json` is
    /// missing or has no usable `version`.
    pub async fn get_content_version(&self) -> String {
        self.fetch_json("version.json")
            .await
            .as_ref()
            .and_then(|file| file.get("version"))
            .and_then(Value::as_str)
            .filter(|version| !version.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| AppConfig::DEFAULT_CONTENT_VERSION.to_string())
    }

    /// Load an article, preferring the JSON form over markdown.
    pub async fn load_article(&self, article_id: &str) -> Option<Article> {
        if let Some(article) = self
            .fetch_json(&format!("articles/{}.json", article_id))
            .await
            .filter(|article| !article.is_null())
        {
            return Some(Article::Structured(article));
        }

        let markdown = self
            .fetch_text(&format!("articles/{}.md", article_id))
            .await
            .filter(|text| !text.is_empty())?;
        Some(Article::Text(TextArticle {
            id: article_id.to_string(),
            content: markdown,
            format: ArticleFormat::Markdown,
        }))
    }

    /// Compare `local_version` with the remote content version.
    pub async fn check_for_updates(&self, local_version: &str) -> UpdateCheck {
        let remote_version = self.get_content_version().await;
        let check = UpdateCheck::compare(local_version, &remote_version);
        debug!(
            "Content version local={} remote={} (update: {})",
            check.local_version, check.remote_version, check.has_updates
        );
        check
    }

    /// Drop all cached documents.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    // Internal methods

    /// Index file if it carries the category's array, else a directory scan.
    async fn load_category(&self, category: ContentCategory) -> Vec<Value> {
        if let Some(index) = self.fetch_json(&category.index_path()).await {
            if let Some(items) = index.get(category.index_field()).and_then(Value::as_array) {
                info!("Loaded {} {} from index", items.len(), category);
                return items.clone();
            }
            warn!(
                "{} has no '{}' array, scanning directory",
                category.index_path(),
                category.index_field()
            );
        }

        let files: Vec<RepoFile> = self
            .list_files(category.directory(), Some(".json"))
            .await
            .into_iter()
            .filter(|file| file.name != INDEX_FILE)
            .collect();

        // Bounded concurrency; `buffered` keeps the listing order.
        let entries: Vec<Value> = stream::iter(files)
            .map(|file| async move {
                let data = self.fetch_json(&file.path).await;
                data.and_then(|data| with_entry_id(data, &file.name))
            })
            .buffered(NetworkConfig::DIRECTORY_SCAN_CONCURRENCY)
            .filter_map(|entry| async move { entry })
            .collect()
            .await;

        info!("Loaded {} {} from directory scan", entries.len(), category);
        entries
    }

    async fn request_json(&self, path: &str) -> Result<Value> {
        let url = self.source.file_url(path);
        let response = self
            .http
            .get_with_headers(
                &url,
                &[("Accept", "application/json"), ("Cache-Control", "no-cache")],
            )
            .await?;
        let body = read_success_body(response, &url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn request_text(&self, path: &str) -> Result<String> {
        let url = self.source.file_url(path);
        let response = self.http.get(&url).await?;
        read_success_body(response, &url).await
    }

    async fn request_listing(&self, directory: &str) -> Result<Vec<ListingEntry>> {
        let url = self.source.listing_url(directory);
        let response = self
            .http
            .get_with_headers(&url, &[("Accept", NetworkConfig::GITHUB_API_ACCEPT)])
            .await?;
        let body = read_success_body(response, &url).await?;

        let Value::Array(items) = serde_json::from_str::<Value>(&body)? else {
            return Err(FitnessError::Other(format!(
                "listing for {} is not an array",
                directory
            )));
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<ListingEntry>(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping malformed listing entry in {}: {}", directory, e);
                    None
                }
            })
            .collect())
    }
}

/// Body of a successful response; any other status is an error.
async fn read_success_body(response: reqwest::Response, url: &str) -> Result<String> {
    let status = response.status();
    if !status.is_success() {
        return Err(FitnessError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

fn log_fetch_failure(path: &str, error: &FitnessError) {
    match error {
        // Optional files (index, version, article forms) are routinely absent.
        FitnessError::HttpStatus { status, .. } if *status == StatusCode::NOT_FOUND.as_u16() => {
            debug!("Content file {} not found", path)
        }
        _ => warn!("Failed to load {}: {}", path, error),
    }
}

/// Give a scanned document the id derived from its filename, unless it
/// already has one. Non-object documents are dropped.
fn with_entry_id(data: Value, file_name: &str) -> Option<Value> {
    let Value::Object(mut map) = data else {
        warn!("Skipping {}: not a JSON object", file_name);
        return None;
    };

    if map.get("id").map_or(true, Value::is_null) {
        let id = file_name.strip_suffix(".json").unwrap_or(file_name);
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
    Some(Value::Object(map))
}
