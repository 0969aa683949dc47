//! Application shell.
//!
//! [`FitnessApp`] owns the identity adapter, the key/value store, the
//! content loader and the [`AppState`]. `start()` runs the startup sequence:
//!
//! 1. read the user identity from the host
//! 2. load settings, workout history and custom entries
//! 3. load content from the persisted snapshot, or from the remote
//! 4. check the remote content version
//! 5. render the home screen
//!
//! Any failure in that sequence renders the error screen instead.

mod builder;
mod loading;
mod screen;
mod state;

pub use builder::FitnessAppBuilder;
pub use screen::{ErrorScreen, HomeScreen, RetryAction, Screen, Tab, WorkoutSummary};
pub use state::{
    AppState, ContentOrigin, ContentState, EntryId, ScreenKind, Settings, Theme, UiState,
    UserData, WeightUnit, WorkoutEntry,
};

use crate::config::AppConfig;
use crate::content::{Article, ContentLoader, UpdateCheck};
use crate::host::{HapticStyle, IdentityAdapter};
use crate::storage::KeyValueStore;
use crate::Result;
use tracing::{debug, error, info};

/// The assembled application.
pub struct FitnessApp {
    identity: IdentityAdapter,
    storage: KeyValueStore,
    loader: ContentLoader,
    state: AppState,
}

impl FitnessApp {
    pub fn builder() -> FitnessAppBuilder {
        FitnessAppBuilder::new()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn identity(&self) -> &IdentityAdapter {
        &self.identity
    }

    pub fn storage(&self) -> &KeyValueStore {
        &self.storage
    }

    pub fn loader(&self) -> &ContentLoader {
        &self.loader
    }

    /// Run the startup sequence and return the screen to show.
    pub async fn start(&mut self) -> Screen {
        self.state.ui = UiState::default();
        info!("Starting {}", AppConfig::APP_NAME);

        match self.initialize().await {
            Ok(origin) => {
                self.state.ui = UiState {
                    current_screen: ScreenKind::Main,
                    loading: false,
                };
                info!(?origin, "Startup complete");
                screen::render_main_screen(&self.state)
            }
            Err(e) => {
                error!(retryable = e.is_retryable(), "Startup failed: {}", e);
                self.state.ui = UiState {
                    current_screen: ScreenKind::Error,
                    loading: false,
                };
                screen::render_error_screen()
            }
        }
    }

    /// Full reload: drop every cache and state, then start again.
    pub async fn retry(&mut self) -> Screen {
        info!("Reloading");
        self.loader.clear_cache();
        self.storage.clear_cache().await;
        self.state = AppState::default();
        self.start().await
    }

    /// Compare the current content version with the remote one.
    ///
    /// A difference is remembered as a pending update when a host is present
    /// to ask the user about it.
    pub async fn check_content_updates(&mut self) -> UpdateCheck {
        let local_version = self
            .state
            .content
            .version
            .as_deref()
            .unwrap_or(AppConfig::DEFAULT_CONTENT_VERSION);
        let check = self.loader.check_for_updates(local_version).await;

        if check.has_updates && self.identity.is_available() {
            info!(
                "Content update available: {} -> {}",
                check.local_version, check.remote_version
            );
            self.state.pending_update = Some(check.clone());
        }
        check
    }

    /// Ask the user about a pending content update.
    ///
    /// On confirmation the content is refreshed and the re-rendered home
    /// screen is returned. `Ok(None)` when nothing was pending or the user
    /// declined.
    pub async fn prompt_pending_update(&mut self) -> Result<Option<Screen>> {
        if self.state.pending_update.take().is_none() {
            return Ok(None);
        }
        if !self.identity.show_confirm(AppConfig::UPDATE_PROMPT).await {
            debug!("Content update declined");
            return Ok(None);
        }

        self.refresh_content().await?;
        Ok(Some(screen::render_main_screen(&self.state)))
    }

    /// Fetch content from the remote, ignoring the persisted snapshot and
    /// the loader's cache, and persist the result.
    pub async fn refresh_content(&mut self) -> Result<ContentOrigin> {
        self.loader.clear_cache();
        loading::fetch_remote_content(&self.storage, &self.loader, &mut self.state.content).await
    }

    /// Load an article, keeping it in state for later lookups.
    pub async fn open_article(&mut self, article_id: &str) -> Option<&Article> {
        let cached = self
            .state
            .content
            .articles
            .iter()
            .position(|a| a.id() == Some(article_id));
        if let Some(pos) = cached {
            return self.state.content.articles.get(pos);
        }

        let article = self.loader.load_article(article_id).await?;
        self.state.content.articles.push(article);
        self.state.content.articles.last()
    }

    pub fn start_workout(&self, program_id: &str) {
        self.identity.haptic_feedback(HapticStyle::Medium);
        debug!("Start workout from program {}", program_id);
    }

    pub fn start_empty_workout(&self) {
        self.identity.haptic_feedback(HapticStyle::Medium);
        debug!("Start empty workout");
    }

    pub fn view_workout(&self, workout_id: &str) {
        self.identity.haptic_feedback(HapticStyle::Light);
        debug!("View workout {}", workout_id);
    }

    async fn initialize(&mut self) -> Result<ContentOrigin> {
        self.state.user = self.identity.user().cloned();
        self.state.user_data = loading::load_user_data(&self.storage).await;
        let origin =
            loading::load_content(&self.storage, &self.loader, &mut self.state.content).await?;
        self.check_content_updates().await;
        Ok(origin)
    }
}
