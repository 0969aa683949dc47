//! End-to-end startup tests: host, storage and content loader together.

mod common;

use common::{listing_path, mock_source, mount_file, TestHost};
use fitness_core::app::ScreenKind;
use fitness_core::{AppConfig, BackendKind, FitnessApp, LocalStore, Screen};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer, host: Arc<TestHost>) -> FitnessApp {
    FitnessApp::builder()
        .host(host)
        .content_source(mock_source(server))
        .build()
        .unwrap()
}

async fn mount_catalog(server: &MockServer, version: &str, exercises: usize) {
    let exercises: Vec<_> = (0..exercises)
        .map(|i| json!({"id": format!("ex-{}", i)}))
        .collect();
    mount_file(server, "exercises/index.json", json!({"exercises": exercises}), 1).await;
    mount_file(server, "programs/index.json", json!({"programs": [{"id": "ppl"}]}), 1).await;
    Mock::given(method("GET"))
        .and(path(common::raw_path("version.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": version})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_first_start_fetches_and_persists_content() {
    let server = MockServer::start().await;
    mount_catalog(&server, "1.0.0", 3).await;
    let host = Arc::new(TestHost::new(false));
    let mut app = app_for(&server, host.clone());
    assert_eq!(app.storage().backend_kind(), BackendKind::Cloud);

    let Screen::Main(home) = app.start().await else {
        panic!("expected main screen");
    };
    assert_eq!(home.avatar_initial, 'S');
    assert_eq!(home.exercise_count, 3);
    assert_eq!(home.program_count, 1);
    assert_eq!(home.content_version.as_deref(), Some("1.0.0"));
    assert_eq!(app.state().ui.current_screen, ScreenKind::Main);
    let user = app.state().user.as_ref().unwrap();
    assert_eq!(user.photo_url.as_deref(), Some("https://t.me/i/userpic/320/sam.jpg"));

    assert_eq!(host.cloud.raw("contentVersion").as_deref(), Some("1.0.0"));
    let cached: serde_json::Value =
        serde_json::from_str(&host.cloud.raw("cachedExercises").unwrap()).unwrap();
    assert_eq!(cached.as_array().map(Vec::len), Some(3));
    assert!(app.state().pending_update.is_none());
}

#[tokio::test]
async fn test_snapshot_wins_over_remote() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(common::raw_path("exercises/index.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"exercises": []})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(listing_path("exercises")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    mount_file(&server, "version.json", json!({"version": "1.0.0"}), 1).await;

    let host = Arc::new(TestHost::new(false));
    let mut app = app_for(&server, host.clone());
    let storage = app.storage();
    assert!(storage.set("contentVersion", &json!("1.0.0")).await);
    assert!(storage.set("cachedExercises", &json!([{"id": "squat"}])).await);
    assert!(storage.set("cachedPrograms", &json!([])).await);
    assert!(
        storage
            .set(
                "workouts",
                &json!([
                    {"id": 1, "date": "2026-10-01", "name": "A", "exercises": []},
                    {"id": 2, "date": "2026-10-03", "name": "B", "exercises": []},
                    {"id": 3, "date": "2026-10-04", "name": "C", "exercises": []},
                    {"id": 4, "date": "2026-10-05", "name": "D", "exercises": [{"id": "squat"}]}
                ])
            )
            .await
    );

    let Screen::Main(home) = app.start().await else {
        panic!("expected main screen");
    };
    assert_eq!(home.exercise_count, 1);
    assert_eq!(home.program_count, 0);
    let names: Vec<&str> = home.recent_workouts.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["D", "C", "B"]);
    assert_eq!(home.recent_workouts[0].date_label.as_deref(), Some("5 Oct"));
    assert!(host.prompts().is_empty());
}

#[tokio::test]
async fn test_no_content_renders_error_then_retry_recovers() {
    let server = MockServer::start().await;
    let host = Arc::new(TestHost::new(false));
    let mut app = app_for(&server, host);

    let Screen::Error(error) = app.start().await else {
        panic!("expected error screen");
    };
    assert_eq!(error.message, AppConfig::STARTUP_ERROR_MESSAGE);
    assert_eq!(app.state().ui.current_screen, ScreenKind::Error);

    mount_catalog(&server, "1.0.0", 2).await;
    let Screen::Main(home) = app.retry().await else {
        panic!("expected main screen after retry");
    };
    assert_eq!(home.exercise_count, 2);
}

#[tokio::test]
async fn test_confirmed_update_refreshes_content() {
    let server = MockServer::start().await;
    mount_file(
        &server,
        "exercises/index.json",
        json!({"exercises": [{"id": "squat"}, {"id": "row"}, {"id": "press"}]}),
        1,
    )
    .await;
    mount_file(&server, "programs/index.json", json!({"programs": []}), 1).await;
    mount_file(&server, "version.json", json!({"version": "1.1.0"}), 2).await;

    let host = Arc::new(TestHost::new(true));
    let mut app = app_for(&server, host.clone());
    assert!(app.storage().set("contentVersion", &json!("1.0.0")).await);
    assert!(app.storage().set("cachedExercises", &json!([{"id": "squat"}])).await);
    assert!(app.storage().set("cachedPrograms", &json!([])).await);

    let Screen::Main(home) = app.start().await else {
        panic!("expected main screen");
    };
    assert_eq!(home.exercise_count, 1);
    let pending = app.state().pending_update.clone().unwrap();
    assert_eq!(pending.remote_version, "1.1.0");

    let Some(Screen::Main(home)) = app.prompt_pending_update().await.unwrap() else {
        panic!("expected refreshed main screen");
    };
    assert_eq!(home.exercise_count, 3);
    assert_eq!(home.content_version.as_deref(), Some("1.1.0"));
    assert_eq!(host.prompts(), vec![AppConfig::UPDATE_PROMPT.to_string()]);
    assert_eq!(host.cloud.raw("contentVersion").as_deref(), Some("1.1.0"));
    assert!(app.state().pending_update.is_none());
}

#[tokio::test]
async fn test_detached_app_persists_to_local_file() {
    let server = MockServer::start().await;
    mount_catalog(&server, "2.0.0", 1).await;
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("fitness.json");

    let mut app = FitnessApp::builder()
        .local_store_path(&store_path)
        .content_source(mock_source(&server))
        .build()
        .unwrap();
    assert_eq!(app.storage().backend_kind(), BackendKind::Local);

    let Screen::Main(home) = app.start().await else {
        panic!("expected main screen");
    };
    assert_eq!(home.avatar_initial, 'A');

    let reopened = LocalStore::open(&store_path).unwrap();
    assert_eq!(reopened.get("fitness_contentVersion").as_deref(), Some("2.0.0"));
    assert!(reopened.get("fitness_cachedExercises").is_some());
}
