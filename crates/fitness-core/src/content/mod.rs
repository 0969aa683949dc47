//! Content catalog: exercises, programs and articles from a GitHub repository.

mod cache;
mod loader;
mod types;

pub use cache::PathCache;
pub use loader::ContentLoader;
pub use types::{
    Article, ArticleFormat, ContentCategory, RepoFile, TextArticle, UpdateCheck, INDEX_FILE,
};
