//! Screen view models produced by the shell.

use super::state::{AppState, WorkoutEntry};
use crate::config::AppConfig;
use serde::Serialize;

/// Placeholder letter when the user has no first name.
const DEFAULT_AVATAR_INITIAL: char = 'A';

/// Bottom navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    Home,
    Programs,
    Exercises,
    Stats,
    Profile,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Home,
        Tab::Programs,
        Tab::Exercises,
        Tab::Stats,
        Tab::Profile,
    ];
}

/// What the error screen's button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryAction {
    /// Full reload of the app.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSummary {
    pub id: String,
    pub name: String,
    /// "5 Oct"; `None` when the stored date is unparseable.
    pub date_label: Option<String>,
    pub exercise_count: usize,
}

impl From<&WorkoutEntry> for WorkoutSummary {
    fn from(workout: &WorkoutEntry) -> Self {
        Self {
            id: workout.id.to_string(),
            name: workout.name.clone(),
            date_label: workout.date_label(),
            exercise_count: workout.exercises.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeScreen {
    pub avatar_initial: char,
    /// Newest first; empty means "no workouts yet".
    pub recent_workouts: Vec<WorkoutSummary>,
    pub exercise_count: usize,
    pub program_count: usize,
    pub content_version: Option<String>,
    pub tabs: Vec<Tab>,
    pub active_tab: Tab,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorScreen {
    pub message: String,
    pub retry: RetryAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "lowercase")]
pub enum Screen {
    Loading,
    Main(HomeScreen),
    Error(ErrorScreen),
}

impl Screen {
    pub fn is_error(&self) -> bool {
        matches!(self, Screen::Error(_))
    }
}

pub(crate) fn render_main_screen(state: &AppState) -> Screen {
    let avatar_initial = state
        .user
        .as_ref()
        .and_then(|user| user.initial())
        .unwrap_or(DEFAULT_AVATAR_INITIAL);

    Screen::Main(HomeScreen {
        avatar_initial,
        recent_workouts: state
            .user_data
            .recent_workouts()
            .into_iter()
            .map(WorkoutSummary::from)
            .collect(),
        exercise_count: state.content.exercises.len(),
        program_count: state.content.programs.len(),
        content_version: state.content.version.clone(),
        tabs: Tab::ALL.to_vec(),
        active_tab: Tab::Home,
    })
}

pub(crate) fn render_error_screen() -> Screen {
    Screen::Error(ErrorScreen {
        message: AppConfig::STARTUP_ERROR_MESSAGE.to_string(),
        retry: RetryAction::Reload,
    })
}
