//! Application state owned by the shell.

use crate::config::AppConfig;
use crate::content::{Article, UpdateCheck};
use crate::host::UserIdentity;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// User preferences, persisted under the `settings` key.
///
/// Fields missing from a stored record take their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub weight_unit: WeightUnit,
    pub theme: Theme,
    /// Rest timer between sets, in seconds.
    pub rest_timer: u32,
    pub auto_progression: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Kg,
            theme: Theme::Dark,
            rest_timer: 90,
            auto_progression: true,
        }
    }
}

/// Workout ids are timestamps on some clients and strings on others.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{}", n),
            EntryId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// One completed workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub id: EntryId,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<Value>,
}

impl WorkoutEntry {
    /// Short display date ("5 Oct"); `None` if `date` isn't RFC 3339 or
    /// `YYYY-MM-DD`.
    pub fn date_label(&self) -> Option<String> {
        let date = DateTime::parse_from_rfc3339(&self.date)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(&self.date, "%Y-%m-%d"))
            .ok()?;
        Some(date.format("%-d %b").to_string())
    }
}

/// Everything loaded from the key/value store at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserData {
    pub settings: Settings,
    /// Insertion order, oldest first.
    pub workouts: Vec<WorkoutEntry>,
    pub custom_programs: Vec<Value>,
    pub custom_exercises: Vec<Value>,
}

impl UserData {
    /// The most recent workouts, newest first.
    pub fn recent_workouts(&self) -> Vec<&WorkoutEntry> {
        self.workouts
            .iter()
            .rev()
            .take(AppConfig::RECENT_WORKOUTS_LIMIT)
            .collect()
    }
}

/// The content catalog currently in use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentState {
    pub exercises: Vec<Value>,
    pub programs: Vec<Value>,
    pub articles: Vec<Article>,
    pub version: Option<String>,
}

/// Where the current content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentOrigin {
    /// The snapshot persisted in the key/value store.
    Snapshot,
    /// A fresh fetch from the content repository.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenKind {
    #[default]
    Loading,
    Main,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub current_screen: ScreenKind,
    pub loading: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_screen: ScreenKind::Loading,
            loading: true,
        }
    }
}

/// The whole application state; owned by `FitnessApp` and passed down
/// explicitly to loaders and renderers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user: Option<UserIdentity>,
    pub user_data: UserData,
    pub content: ContentState,
    pub ui: UiState,
    /// Set when startup found newer remote content the user hasn't accepted.
    pub pending_update: Option<UpdateCheck>,
}
