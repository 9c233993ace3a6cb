//! Shared fixtures for the integration suites
#![allow(dead_code)]

use std::sync::Arc;

use taskflow_timer::{
    state::{AppState, PomodoroSettings},
    store::{MemoryStore, NewTask, TaskRecord},
};

/// Build an engine with an authenticated session and an empty store
pub fn engine() -> Arc<AppState> {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        store,
        PomodoroSettings::default(),
    ));
    state.set_session(Some("tester".to_string())).unwrap();
    state
}

/// Create a task document in the engine's store
pub async fn seed_task(state: &AppState, name: &str) -> TaskRecord {
    seed_task_with_settings(state, name, None).await
}

/// Create a task document carrying its own pomodoro settings
pub async fn seed_task_with_settings(
    state: &AppState,
    name: &str,
    pomodoro_settings: Option<PomodoroSettings>,
) -> TaskRecord {
    state
        .store
        .create(NewTask {
            name: name.to_string(),
            kind: Default::default(),
            priority: Default::default(),
            period: Default::default(),
            tags: Vec::new(),
            pomodoro_settings,
        })
        .await
        .unwrap()
}

/// Let spawned persistence writes run to completion
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
