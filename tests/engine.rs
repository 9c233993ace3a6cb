//! Focus, mode-switch, and persistence-failure tests

mod common;

use std::time::Duration;

use common::{engine, seed_task, settle};
use taskflow_timer::{
    state::{TimerMode, NEUTRAL_TITLE},
    store::{task_path, StoreOperation, TaskStatus},
};
use tokio::time::advance;

#[tokio::test(start_paused = true)]
async fn starting_a_second_task_pauses_the_first() {
    let state = engine();
    let first = seed_task(&state, "Write").await;
    let second = seed_task(&state, "Review").await;

    state.start_timer(&first, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(5)).await;
    state.start_timer(&second, TimerMode::Countdown, 1).unwrap();
    settle().await;

    let paused = state.get_timer_state(&first.id).unwrap().unwrap();
    assert!(!paused.is_running);
    assert_eq!(paused.time, 5);

    let running = state.get_timer_state(&second.id).unwrap().unwrap();
    assert!(running.is_running);

    // The first task's segment was flushed as part of the handover.
    let record = state.store.get(&first.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 5);
    assert_eq!(record.status, TaskStatus::Pending);
    let record = state.store.get(&second.id).await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::InProgress);

    assert_eq!(state.running_task_ids().unwrap(), vec![second.id.clone()]);
    assert_eq!(state.focused_task().unwrap(), Some(second.id.clone()));
}

#[tokio::test(start_paused = true)]
async fn switching_modes_flushes_the_stopwatch_segment() {
    let state = engine();
    let task = seed_task(&state, "Write").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(10)).await;

    let task = state.store.get(&task.id).await.unwrap().unwrap();
    state.start_timer(&task, TimerMode::Countdown, 1).unwrap();
    settle().await;

    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 10);

    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(snapshot.is_running);
    assert_eq!(snapshot.mode, TimerMode::Countdown);
    assert_eq!(snapshot.time, 60);
}

#[tokio::test(start_paused = true)]
async fn failed_write_publishes_an_error_event() {
    let state = engine();
    let task = seed_task(&state, "Write").await;
    let mut errors = state.store_error_tx.subscribe();

    state.store.set_deny_writes(true);
    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();

    let event = errors.recv().await.unwrap();
    assert_eq!(event.path, task_path(&task.id));
    assert_eq!(event.operation, StoreOperation::Update);
    let payload = event.request_payload.unwrap();
    assert_eq!(payload["status"], "in-progress");

    // The in-memory state stays authoritative despite the failure.
    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(snapshot.is_running);
}

#[tokio::test(start_paused = true)]
async fn failed_pause_reports_the_attempted_payload() {
    let state = engine();
    let task = seed_task(&state, "Write").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    settle().await;
    advance(Duration::from_secs(12)).await;

    let mut errors = state.store_error_tx.subscribe();
    state.store.set_deny_writes(true);
    state.pause_timer(&task.id, false).unwrap();

    let event = errors.recv().await.unwrap();
    let payload = event.request_payload.unwrap();
    assert_eq!(payload["status"], "pending");
    assert_eq!(payload["timeSpent"], 12);

    // The paused value survives locally until the next successful write.
    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert_eq!(snapshot.time, 12);
}

#[tokio::test(start_paused = true)]
async fn unload_flush_commits_running_segments() {
    let state = engine();
    let task = seed_task(&state, "Write").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(8)).await;

    state.flush_running_timers().await.unwrap();

    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(!snapshot.is_running);
    assert_eq!(snapshot.time, 8);

    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 8);
    assert_eq!(record.status, TaskStatus::Pending);
    assert_eq!(state.title.current(), NEUTRAL_TITLE);
}

#[tokio::test(start_paused = true)]
async fn unload_flush_failures_are_not_reported() {
    let state = engine();
    let task = seed_task(&state, "Write").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    settle().await;
    advance(Duration::from_secs(10)).await;

    let mut errors = state.store_error_tx.subscribe();
    state.store.set_deny_writes(true);
    state.flush_running_timers().await.unwrap();

    // The write failed, but nobody is told: there is no UI left.
    assert!(errors.try_recv().is_err());

    // In-memory accounting still closed the segment.
    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(!snapshot.is_running);
    assert_eq!(snapshot.time, 10);

    // The store kept its last committed value.
    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 0);
}

#[tokio::test(start_paused = true)]
async fn title_follows_the_focused_stopwatch() {
    let state = engine();
    let task = seed_task(&state, "Write").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(5)).await;
    state.tick().unwrap();
    assert_eq!(state.title.current(), "00:05 - TaskFlow");

    // Ticks with no focused running timer restore the neutral title.
    state.pause_timer(&task.id, false).unwrap();
    state.tick().unwrap();
    assert_eq!(state.title.current(), NEUTRAL_TITLE);
}
