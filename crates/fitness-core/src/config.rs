//! Centralized configuration for the fitness core.
//!
//! Constants for network behaviour, storage keys and host chrome, plus the
//! coordinates of the remote content repository.

use crate::{FitnessError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Fitness Tracker";
    pub const CONTENT_OWNER: &'static str = "adletescenderov300-ui";
    pub const CONTENT_REPO: &'static str = "fitness-content";
    pub const CONTENT_BRANCH: &'static str = "main";
    pub const DEFAULT_CONTENT_VERSION: &'static str = "1.0.0";
    pub const RECENT_WORKOUTS_LIMIT: usize = 3;
    pub const STARTUP_ERROR_MESSAGE: &'static str = "Failed to start the app";
    pub const UPDATE_PROMPT: &'static str = "New exercises and programs are available. Update?";
}

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const USER_AGENT: &'static str = "Fitness-Core/0.1";
    pub const GITHUB_RAW_BASE: &'static str = "https://raw.githubusercontent.com";
    pub const GITHUB_API_BASE: &'static str = "https://api.github.com";
    pub const GITHUB_API_ACCEPT: &'static str = "application/vnd.github.v3+json";
    pub const CONTENT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
    pub const CONTENT_CACHE_CAPACITY: u64 = 512;
    pub const DIRECTORY_SCAN_CONCURRENCY: usize = 4;
}

/// Key/value storage configuration.
pub struct StorageConfig;

impl StorageConfig {
    /// Namespace prefix for keys in the local fallback store.
    pub const LOCAL_KEY_PREFIX: &'static str = "fitness_";

    pub const SETTINGS_KEY: &'static str = "settings";
    pub const WORKOUTS_KEY: &'static str = "workouts";
    pub const CUSTOM_PROGRAMS_KEY: &'static str = "customPrograms";
    pub const CUSTOM_EXERCISES_KEY: &'static str = "customExercises";
    pub const CONTENT_VERSION_KEY: &'static str = "contentVersion";
    pub const CACHED_EXERCISES_KEY: &'static str = "cachedExercises";
    pub const CACHED_PROGRAMS_KEY: &'static str = "cachedPrograms";
}

/// Host UI chrome applied when the host bridge comes up.
pub struct ChromeConfig;

impl ChromeConfig {
    pub const HEADER_COLOR: &'static str = "#000000";
    pub const BACKGROUND_COLOR: &'static str = "#000000";
}

/// Coordinates of the repository that hosts the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSource {
    pub owner: String,
    pub repo: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    /// Base URL for raw file downloads.
    #[serde(default = "default_raw_base")]
    pub raw_base: String,
    /// Base URL for the repository contents (listing) API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_branch() -> String {
    AppConfig::CONTENT_BRANCH.to_string()
}

fn default_raw_base() -> String {
    NetworkConfig::GITHUB_RAW_BASE.to_string()
}

fn default_api_base() -> String {
    NetworkConfig::GITHUB_API_BASE.to_string()
}

impl ContentSource {
    /// Create a source on the default branch of the public GitHub hosts.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: default_branch(),
            raw_base: default_raw_base(),
            api_base: default_api_base(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Point both raw downloads and the listing API at another host.
    ///
    /// The mock server in tests serves both from one origin.
    pub fn with_base_urls(mut self, raw_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        self.raw_base = raw_base.into();
        self.api_base = api_base.into();
        self
    }

    /// Check that the coordinates can produce valid URLs.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("owner", &self.owner), ("repo", &self.repo), ("branch", &self.branch)] {
            if value.trim().is_empty() || value.contains('/') {
                return Err(FitnessError::Config {
                    message: format!("invalid content source {}: {:?}", field, value),
                });
            }
        }
        for base in [&self.raw_base, &self.api_base] {
            url::Url::parse(base).map_err(|e| FitnessError::Config {
                message: format!("invalid base URL {}: {}", base, e),
            })?;
        }
        Ok(())
    }

    /// URL of a file at `path` on the configured branch.
    pub fn file_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            path.trim_start_matches('/')
        )
    }

    /// URL of the contents API listing for `directory`.
    pub fn listing_url(&self, directory: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo,
            directory.trim_matches('/')
        )
    }
}

impl Default for ContentSource {
    fn default() -> Self {
        Self::new(AppConfig::CONTENT_OWNER, AppConfig::CONTENT_REPO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_source_urls() {
        let source = ContentSource::new("acme", "content");
        assert_eq!(
            source.file_url("exercises/index.json"),
            "https://raw.githubusercontent.com/acme/content/main/exercises/index.json"
        );
        assert_eq!(
            source.listing_url("exercises"),
            "https://api.github.com/repos/acme/content/contents/exercises"
        );
    }

    #[test]
    fn test_content_source_custom_base() {
        let source = ContentSource::new("acme", "content")
            .with_branch("dev")
            .with_base_urls("http://127.0.0.1:9000/", "http://127.0.0.1:9000");
        assert_eq!(
            source.file_url("/version.json"),
            "http://127.0.0.1:9000/acme/content/dev/version.json"
        );
        assert!(source.validate().is_ok());
    }

    #[test]
    fn test_content_source_validation() {
        assert!(ContentSource::new("", "content").validate().is_err());
        assert!(ContentSource::new("acme", "a/b").validate().is_err());
        assert!(ContentSource::new("acme", "content")
            .with_base_urls("not a url", "https://api.github.com")
            .validate()
            .is_err());
    }

    #[test]
    fn test_content_source_deserialize_defaults() {
        let source: ContentSource =
            serde_json::from_str(r#"{"owner": "acme", "repo": "content"}"#).unwrap();
        assert_eq!(source, ContentSource::new("acme", "content"));
    }

    #[test]
    fn test_cache_ttl_is_five_minutes() {
        assert_eq!(NetworkConfig::CONTENT_CACHE_TTL, Duration::from_secs(300));
    }
}
