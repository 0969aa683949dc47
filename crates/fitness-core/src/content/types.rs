//! Content catalog types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the optional manifest file in each category directory.
pub const INDEX_FILE: &str = "index.json";

/// A catalog category that supports the index-or-scan loading pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCategory {
    Exercises,
    Programs,
}

impl ContentCategory {
    /// Directory holding this category's documents.
    pub fn directory(&self) -> &'static str {
        match self {
            ContentCategory::Exercises => "exercises",
            ContentCategory::Programs => "programs",
        }
    }

    /// Array field expected inside the index file.
    pub fn index_field(&self) -> &'static str {
        self.directory()
    }

    pub fn index_path(&self) -> String {
        format!("{}/{}", self.directory(), INDEX_FILE)
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.directory())
    }
}

/// Entry of the repository contents listing, as the API returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A file found in a content directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoFile {
    pub name: String,
    pub path: String,
    pub download_url: Option<String>,
    pub size: u64,
}

impl From<ListingEntry> for RepoFile {
    fn from(entry: ListingEntry) -> Self {
        Self {
            name: entry.name,
            path: entry.path,
            download_url: entry.download_url,
            size: entry.size,
        }
    }
}

/// Storage format of an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleFormat {
    Json,
    Markdown,
}

/// Article that only exists as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextArticle {
    pub id: String,
    pub content: String,
    pub format: ArticleFormat,
}

/// An article, either a structured JSON document or plain markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Article {
    Text(TextArticle),
    Structured(Value),
}

impl Article {
    pub fn format(&self) -> ArticleFormat {
        match self {
            Article::Text(text) => text.format,
            Article::Structured(_) => ArticleFormat::Json,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Article::Text(text) => Some(&text.id),
            Article::Structured(value) => value.get("id").and_then(Value::as_str),
        }
    }
}

/// Outcome of comparing the local content version with the remote one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCheck {
    pub has_updates: bool,
    pub local_version: String,
    pub remote_version: String,
}

impl UpdateCheck {
    /// Versions are opaque; any difference counts as an update.
    pub fn compare(local_version: &str, remote_version: &str) -> Self {
        Self {
            has_updates: remote_version != local_version,
            local_version: local_version.to_string(),
            remote_version: remote_version.to_string(),
        }
    }
}
