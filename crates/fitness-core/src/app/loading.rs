//! Startup data loading: user data and the content catalog.

use super::state::{ContentOrigin, ContentState, Settings, UserData, WorkoutEntry};
use crate::config::StorageConfig;
use crate::content::ContentLoader;
use crate::storage::KeyValueStore;
use crate::{FitnessError, Result};
use serde_json::Value;
use tracing::{info, warn};

/// Load settings, history and custom catalog entries, with defaults.
pub(crate) async fn load_user_data(storage: &KeyValueStore) -> UserData {
    let settings = storage
        .get_as(StorageConfig::SETTINGS_KEY, Settings::default())
        .await;
    let workouts = parse_workouts(storage.get_as(StorageConfig::WORKOUTS_KEY, Vec::new()).await);
    let custom_programs: Vec<Value> = storage
        .get_as(StorageConfig::CUSTOM_PROGRAMS_KEY, Vec::new())
        .await;
    let custom_exercises: Vec<Value> = storage
        .get_as(StorageConfig::CUSTOM_EXERCISES_KEY, Vec::new())
        .await;

    info!(
        workouts = workouts.len(),
        programs = custom_programs.len(),
        exercises = custom_exercises.len(),
        "User data loaded"
    );

    UserData {
        settings,
        workouts,
        custom_programs,
        custom_exercises,
    }
}

/// Keep every history entry that parses; a malformed one is dropped alone.
fn parse_workouts(entries: Vec<Value>) -> Vec<WorkoutEntry> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(workout) => Some(workout),
            Err(e) => {
                warn!("Skipping workout #{}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Fill `content` from the persisted snapshot, or from the remote when the
/// snapshot is incomplete.
pub(crate) async fn load_content(
    storage: &KeyValueStore,
    loader: &ContentLoader,
    content: &mut ContentState,
) -> Result<ContentOrigin> {
    let version = storage.get(StorageConfig::CONTENT_VERSION_KEY, Value::Null).await;
    let exercises = storage.get(StorageConfig::CACHED_EXERCISES_KEY, Value::Null).await;
    let programs = storage.get(StorageConfig::CACHED_PROGRAMS_KEY, Value::Null).await;

    if let (Some(version), Value::Array(exercises), Value::Array(programs)) =
        (snapshot_version(&version), exercises, programs)
    {
        info!(
            exercises = exercises.len(),
            programs = programs.len(),
            %version,
            "Content loaded from snapshot"
        );
        content.exercises = exercises;
        content.programs = programs;
        content.version = Some(version);
        return Ok(ContentOrigin::Snapshot);
    }

    fetch_remote_content(storage, loader, content).await
}

/// Fetch the catalog from the remote and persist it as the new snapshot.
///
/// Fails only when no exercises are available at all; an empty program list
/// is accepted. When the remote yields no exercises but `content` already
/// has some, the existing content is kept.
pub(crate) async fn fetch_remote_content(
    storage: &KeyValueStore,
    loader: &ContentLoader,
    content: &mut ContentState,
) -> Result<ContentOrigin> {
    let (exercises, programs, version) = futures::join!(
        loader.load_all_exercises(),
        loader.load_all_programs(),
        loader.get_content_version()
    );

    if exercises.is_empty() {
        if content.exercises.is_empty() {
            return Err(FitnessError::ContentUnavailable {
                message: "failed to load the exercise catalog".to_string(),
            });
        }
        warn!("Remote returned no exercises, keeping current content");
        return Ok(ContentOrigin::Snapshot);
    }
    if programs.is_empty() {
        warn!("Remote returned no programs");
    }

    let persisted = storage
        .set(StorageConfig::CACHED_EXERCISES_KEY, &Value::Array(exercises.clone()))
        .await
        & storage
            .set(StorageConfig::CACHED_PROGRAMS_KEY, &Value::Array(programs.clone()))
            .await
        & storage
            .set(StorageConfig::CONTENT_VERSION_KEY, &Value::String(version.clone()))
            .await;
    if !persisted {
        warn!("Content snapshot was not fully persisted");
    }

    info!(
        exercises = exercises.len(),
        programs = programs.len(),
        %version,
        "Content loaded from remote"
    );
    content.exercises = exercises;
    content.programs = programs;
    content.version = Some(version);
    Ok(ContentOrigin::Remote)
}

/// Version strings are stored raw, so one that looks like a number reads
/// back as a number.
fn snapshot_version(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
