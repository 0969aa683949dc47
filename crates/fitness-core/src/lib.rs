//! Fitness Core - headless core of a fitness-tracking mini app.
//!
//! The app runs inside a chat platform's mini-app host. This crate provides:
//! - an identity adapter over the host bridge ([`IdentityAdapter`])
//! - a JSON key/value store on the host's cloud storage, with a local
//!   fallback ([`KeyValueStore`])
//! - a loader for the exercise/program/article catalog hosted on GitHub
//!   ([`ContentLoader`])
//! - the application shell that ties them together and produces screen view
//!   models ([`FitnessApp`])
//!
//! # Example
//!
//! ```rust,ignore
//! use fitness_core::{FitnessApp, Screen};
//!
//! #[tokio::main]
//! async fn main() -> fitness_core::Result<()> {
//!     fitness_core::logging::init_tracing(false);
//!
//!     let mut app = FitnessApp::builder()
//!         .host(host)
//!         .local_store_path("./fitness-data.json")
//!         .build()?;
//!
//!     if let Screen::Main(home) = app.start().await {
//!         println!("{} exercises loaded", home.exercise_count);
//!     }
//!     if let Some(screen) = app.prompt_pending_update().await? {
//!         println!("Updated: {:?}", screen);
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod host;
pub mod logging;
pub mod network;
pub mod storage;

pub use app::{FitnessApp, FitnessAppBuilder, Screen};
pub use config::{AppConfig, ContentSource};
pub use content::{Article, ContentLoader, UpdateCheck};
pub use error::{FitnessError, Result};
pub use host::{
    CloudStorageApi, HapticStyle, HostUser, IdentityAdapter, MiniAppHost, StorageCallback,
    UserIdentity,
};
pub use storage::{BackendKind, KeyValueStore, LocalStore};
