//! Stopwatch accounting tests

mod common;

use std::time::Duration;

use common::{engine, seed_task, settle};
use taskflow_timer::{state::TimerMode, store::TaskStatus};
use tokio::time::advance;

#[tokio::test(start_paused = true)]
async fn durable_time_accumulates_across_pause_resume() {
    let state = engine();
    let task = seed_task(&state, "Write report").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    settle().await;
    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::InProgress);

    advance(Duration::from_secs(10)).await;
    state.pause_timer(&task.id, false).unwrap();
    settle().await;

    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 10);
    assert_eq!(record.status, TaskStatus::Pending);

    // Resume and accrue five more seconds; totals must not double-count
    // the first segment.
    let task = state.store.get(&task.id).await.unwrap().unwrap();
    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(5)).await;
    state.pause_timer(&task.id, false).unwrap();
    settle().await;

    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 15);
}

#[tokio::test(start_paused = true)]
async fn display_is_derived_between_ticks() {
    let state = engine();
    let task = seed_task(&state, "Practice scales").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(3)).await;

    // No tick has run; consecutive reads still see the live value.
    let first = state.get_timer_state(&task.id).unwrap().unwrap();
    let second = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(first.is_running);
    assert_eq!(first.time, 3);
    assert_eq!(second.time, 3);
}

#[tokio::test(start_paused = true)]
async fn stopwatch_seeds_from_persisted_time() {
    let state = engine();
    let task = seed_task(&state, "Deep work").await;
    state
        .store
        .update(
            &task.id,
            taskflow_timer::store::TaskPatch {
                status: None,
                time_spent: Some(120),
            },
        )
        .await
        .unwrap();

    let task = state.store.get(&task.id).await.unwrap().unwrap();
    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(4)).await;

    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert_eq!(snapshot.time, 124);
}

#[tokio::test(start_paused = true)]
async fn reset_zeroes_durable_time() {
    let state = engine();
    let task = seed_task(&state, "Tidy desk").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(7)).await;
    state.pause_timer(&task.id, false).unwrap();
    settle().await;
    assert_eq!(
        state.store.get(&task.id).await.unwrap().unwrap().time_spent,
        7
    );

    state.reset_timer(&task.id).unwrap();
    settle().await;

    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.time_spent, 0);

    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(!snapshot.is_running);
    assert_eq!(snapshot.time, 0);
}

#[tokio::test(start_paused = true)]
async fn operations_without_session_are_ignored() {
    let state = engine();
    state.set_session(None).unwrap();
    let task = seed_task(&state, "Meditate").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    state.pause_timer(&task.id, false).unwrap();
    state.reset_timer(&task.id).unwrap();
    settle().await;

    assert!(state.get_timer_state(&task.id).unwrap().is_none());
    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Pending);
    assert!(record.updated_at.is_none());
}

#[tokio::test(start_paused = true)]
async fn pause_and_reset_without_timer_state_are_noops() {
    let state = engine();
    let task = seed_task(&state, "Stretch").await;

    state.pause_timer(&task.id, false).unwrap();
    state.reset_timer(&task.id).unwrap();
    settle().await;

    assert!(state.get_timer_state(&task.id).unwrap().is_none());
    let record = state.store.get(&task.id).await.unwrap().unwrap();
    assert!(record.updated_at.is_none());
}

#[tokio::test(start_paused = true)]
async fn pausing_a_paused_timer_changes_nothing() {
    let state = engine();
    let task = seed_task(&state, "Review notes").await;

    state.start_timer(&task, TimerMode::Stopwatch, 0).unwrap();
    advance(Duration::from_secs(6)).await;
    state.pause_timer(&task.id, false).unwrap();
    settle().await;

    state.pause_timer(&task.id, false).unwrap();
    settle().await;

    let snapshot = state.get_timer_state(&task.id).unwrap().unwrap();
    assert!(!snapshot.is_running);
    assert_eq!(snapshot.time, 6);
    assert_eq!(
        state.store.get(&task.id).await.unwrap().unwrap().time_spent,
        6
    );
}
