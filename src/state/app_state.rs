//! Main application state management
//!
//! `AppState` is the timer engine: the per-task timer registry, the
//! lifecycle operations that mutate it, the 1-second tick step, and the
//! persistence bridge that turns accounting events into fire-and-forget
//! store writes.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use tokio::{sync::broadcast, task::JoinHandle, time::Instant};
use tracing::{debug, info, warn};

use crate::{
    services::Notifier,
    store::{task_path, MemoryStore, StoreErrorEvent, StoreOperation, TaskPatch, TaskRecord, TaskStatus},
    utils::format_time,
};

use super::{
    timer_state::{PomodoroPhase, PomodoroSettings, TimerMode, TimerState},
    title::TitleAnnouncer,
};

/// Main application state holding the timer registry and its surfaces
#[derive(Debug)]
pub struct AppState {
    /// Per-task timer registry; exclusively mutated by the engine
    timers: Mutex<HashMap<String, TimerState>>,
    /// Task whose timer is currently mirrored into the document title
    focused: Mutex<Option<String>>,
    /// Authenticated user for this session; mutating operations silently
    /// no-op without one
    session: Mutex<Option<String>>,
    /// Task document store the persistence bridge writes to
    pub store: Arc<MemoryStore>,
    /// Global default pomodoro settings, used when a task carries none
    pub default_pomodoro: PomodoroSettings,
    /// Document title surface
    pub title: TitleAnnouncer,
    /// Notification surface
    pub notifier: Notifier,
    /// Channel carrying store write failure events
    pub store_error_tx: broadcast::Sender<StoreErrorEvent>,
    /// Server metadata
    pub start_time: std::time::Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create a new AppState with an empty timer registry
    pub fn new(
        port: u16,
        host: String,
        store: Arc<MemoryStore>,
        default_pomodoro: PomodoroSettings,
    ) -> Self {
        let (store_error_tx, _) = broadcast::channel(100);

        Self {
            timers: Mutex::new(HashMap::new()),
            focused: Mutex::new(None),
            session: Mutex::new(None),
            store,
            default_pomodoro,
            title: TitleAnnouncer::new(),
            notifier: Notifier::new(),
            store_error_tx,
            start_time: std::time::Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Set or clear the session user
    pub fn set_session(&self, user: Option<String>) -> Result<(), String> {
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Failed to lock session: {}", e))?;
        *session = user;
        Ok(())
    }

    /// Current session user, if any
    pub fn session_user(&self) -> Result<Option<String>, String> {
        self.session
            .lock()
            .map(|session| session.clone())
            .map_err(|e| format!("Failed to lock session: {}", e))
    }

    fn lock_timers(&self) -> Result<MutexGuard<'_, HashMap<String, TimerState>>, String> {
        self.timers
            .lock()
            .map_err(|e| format!("Failed to lock timer registry: {}", e))
    }

    /// Start (or resume) a timer for a task.
    ///
    /// Any other running timer is paused first, so no two segments ever
    /// accrue simultaneously and the task becomes the single
    /// title-focused timer. Starting the same mode resumes where the
    /// timer paused; a different mode reseeds it.
    pub fn start_timer(
        &self,
        task: &TaskRecord,
        mode: TimerMode,
        duration_minutes: u64,
    ) -> Result<(), String> {
        if self.session_user()?.is_none() {
            debug!("Ignoring start for task {}: no user session", task.id);
            return Ok(());
        }

        // Close every running segment (flushing its accounting) before
        // installing the new one.
        for running_id in self.running_task_ids()? {
            self.pause_timer_inner(&running_id, false)?;
        }

        let now = Instant::now();
        let settings =
            PomodoroSettings::resolve(task.pomodoro_settings.as_ref(), &self.default_pomodoro);

        {
            let mut timers = self.lock_timers()?;
            let state = match timers.get(&task.id) {
                Some(existing) if existing.mode == mode => {
                    let mut resumed = existing.clone();
                    if mode == TimerMode::Countdown && resumed.time == 0 {
                        // An expired countdown restarts at its configured
                        // length rather than expiring again immediately.
                        let seconds = if duration_minutes > 0 {
                            duration_minutes * 60
                        } else {
                            resumed.initial_duration
                        };
                        resumed.time = seconds;
                        resumed.initial_duration = seconds;
                    }
                    resumed.is_running = true;
                    resumed.start_time = Some(now);
                    resumed
                }
                _ => match mode {
                    TimerMode::Stopwatch => TimerState::stopwatch(task.time_spent, settings, now),
                    TimerMode::Countdown => {
                        TimerState::countdown(duration_minutes * 60, task.time_spent, settings, now)
                    }
                    TimerMode::Pomodoro => TimerState::pomodoro(task.time_spent, settings, now),
                },
            };
            timers.insert(task.id.clone(), state);
        }

        self.set_focus(&task.id)?;
        self.record_action("start");
        info!("Started {:?} timer for task {}", mode, task.id);

        self.spawn_update(&task.id, TaskPatch::status(TaskStatus::InProgress), true);
        Ok(())
    }

    /// Pause a running timer, committing the segment's accounting.
    ///
    /// A no-op for idle or unknown timers. With `is_unloading` the final
    /// write is still fired but its failure is not reported — there is
    /// nobody left to act on it.
    pub fn pause_timer(&self, task_id: &str, is_unloading: bool) -> Result<(), String> {
        self.pause_timer_inner(task_id, is_unloading).map(|_| ())
    }

    fn pause_timer_inner(
        &self,
        task_id: &str,
        is_unloading: bool,
    ) -> Result<Option<JoinHandle<()>>, String> {
        if self.session_user()?.is_none() {
            debug!("Ignoring pause for task {}: no user session", task_id);
            return Ok(None);
        }

        let committed = {
            let mut timers = self.lock_timers()?;
            let Some(timer) = timers.get_mut(task_id) else {
                return Ok(None);
            };
            if !timer.is_running {
                return Ok(None);
            }
            timer.pause_segment(Instant::now())
        };

        self.clear_focus_if(task_id)?;
        self.record_action("pause");
        info!("Paused timer for task {}", task_id);

        let patch = TaskPatch {
            status: Some(TaskStatus::Pending),
            time_spent: committed,
        };
        Ok(Some(self.spawn_update(task_id, patch, !is_unloading)))
    }

    /// Reset a timer to its mode's starting point.
    ///
    /// A stopwatch reset durably zeroes the task's accumulated time;
    /// countdown restarts at its configured length; pomodoro returns to
    /// the first work phase.
    pub fn reset_timer(&self, task_id: &str) -> Result<(), String> {
        if self.session_user()?.is_none() {
            debug!("Ignoring reset for task {}: no user session", task_id);
            return Ok(());
        }

        let patch = {
            let mut timers = self.lock_timers()?;
            let Some(timer) = timers.get_mut(task_id) else {
                return Ok(());
            };
            let patch = match timer.mode {
                TimerMode::Stopwatch => {
                    timer.time = 0;
                    timer.initial_time_spent = 0;
                    Some(TaskPatch {
                        status: None,
                        time_spent: Some(0),
                    })
                }
                TimerMode::Countdown => {
                    timer.time = timer.initial_duration;
                    None
                }
                TimerMode::Pomodoro => {
                    let work_seconds = timer.pomodoro_settings.phase_seconds(PomodoroPhase::Work);
                    timer.time = work_seconds;
                    timer.initial_duration = work_seconds;
                    timer.pomodoro_phase = PomodoroPhase::Work;
                    timer.current_cycle = 1;
                    None
                }
            };
            timer.is_running = false;
            timer.start_time = None;
            patch
        };

        self.clear_focus_if(task_id)?;
        self.record_action("reset");
        info!("Reset timer for task {}", task_id);

        if let Some(patch) = patch {
            self.spawn_update(task_id, patch, true);
        }
        Ok(())
    }

    /// Current timer state for a task with its live display value.
    ///
    /// Pure read: the returned snapshot derives the display value from
    /// the running segment's start instant, so consumers see correct
    /// time between ticks.
    pub fn get_timer_state(&self, task_id: &str) -> Result<Option<TimerState>, String> {
        let now = Instant::now();
        let timers = self.lock_timers()?;
        Ok(timers.get(task_id).map(|timer| {
            let mut snapshot = timer.clone();
            snapshot.time = timer.display_time(now);
            snapshot
        }))
    }

    /// Ids of all currently running timers
    pub fn running_task_ids(&self) -> Result<Vec<String>, String> {
        let timers = self.lock_timers()?;
        Ok(timers
            .iter()
            .filter(|(_, timer)| timer.is_running)
            .map(|(task_id, _)| task_id.clone())
            .collect())
    }

    /// Task currently mirrored into the document title
    pub fn focused_task(&self) -> Result<Option<String>, String> {
        self.focused
            .lock()
            .map(|focused| focused.clone())
            .map_err(|e| format!("Failed to lock focus: {}", e))
    }

    fn set_focus(&self, task_id: &str) -> Result<(), String> {
        let mut focused = self
            .focused
            .lock()
            .map_err(|e| format!("Failed to lock focus: {}", e))?;
        *focused = Some(task_id.to_string());
        Ok(())
    }

    fn clear_focus_if(&self, task_id: &str) -> Result<(), String> {
        let mut focused = self
            .focused
            .lock()
            .map_err(|e| format!("Failed to lock focus: {}", e))?;
        if focused.as_deref() == Some(task_id) {
            *focused = None;
            drop(focused);
            self.title.clear();
        }
        Ok(())
    }

    /// One scheduler step: expire countdowns, advance due pomodoro
    /// phases, and mirror the focused timer into the title.
    ///
    /// Display values are derived, never mutated here, so a delayed or
    /// missed tick cannot lose or double-count seconds.
    pub fn tick(&self) -> Result<(), String> {
        let now = Instant::now();
        let focused = self.focused_task()?;

        let mut finished: Vec<String> = Vec::new();
        let mut transitions: Vec<(String, PomodoroPhase, PomodoroSettings, Option<u64>)> =
            Vec::new();
        let mut focused_title: Option<String> = None;

        {
            let mut timers = self.lock_timers()?;
            for (task_id, timer) in timers.iter_mut() {
                if !timer.is_running {
                    continue;
                }

                if timer.is_expired(now) {
                    match timer.mode {
                        TimerMode::Countdown => {
                            timer.time = 0;
                            timer.is_running = false;
                            timer.start_time = None;
                            finished.push(task_id.clone());
                        }
                        TimerMode::Pomodoro => {
                            let committed = timer.advance_pomodoro_phase(now);
                            transitions.push((
                                task_id.clone(),
                                timer.pomodoro_phase,
                                timer.pomodoro_settings,
                                committed,
                            ));
                        }
                        TimerMode::Stopwatch => {}
                    }
                }

                if timer.is_running && focused.as_deref() == Some(task_id.as_str()) {
                    focused_title =
                        Some(format!("{} - TaskFlow", format_time(timer.display_time(now))));
                }
            }
        }

        for task_id in finished {
            info!("Countdown finished for task {}", task_id);
            self.notifier
                .notify("Timer Finished!", "The timer for your task has ended.");
            self.clear_focus_if(&task_id)?;
        }

        for (task_id, phase, settings, committed) in transitions {
            let (title, description) = match phase {
                PomodoroPhase::ShortBreak => (
                    "Short Break Time!",
                    format!("Time for a {}-minute break.", settings.short_break_duration),
                ),
                PomodoroPhase::LongBreak => (
                    "Long Break Time!",
                    format!("Time for a {}-minute break.", settings.long_break_duration),
                ),
                PomodoroPhase::Work => (
                    "Back to Work!",
                    format!(
                        "Starting a new {}-minute work session.",
                        settings.work_duration
                    ),
                ),
            };
            info!("Pomodoro phase change for task {}: {:?}", task_id, phase);
            self.notifier.notify(title, &description);

            if let Some(time_spent) = committed {
                self.spawn_update(
                    &task_id,
                    TaskPatch {
                        status: None,
                        time_spent: Some(time_spent),
                    },
                    true,
                );
            }
        }

        match focused_title {
            Some(title) => self.title.announce(title),
            None => self.title.clear(),
        }

        Ok(())
    }

    /// Pause every running timer ahead of process teardown, awaiting the
    /// final writes. Failures are logged but not reported — the session
    /// is going away.
    pub async fn flush_running_timers(&self) -> Result<(), String> {
        let mut handles = Vec::new();
        for task_id in self.running_task_ids()? {
            if let Some(handle) = self.pause_timer_inner(&task_id, true)? {
                handles.push(handle);
            }
        }

        let flushed = handles.len();
        for handle in handles {
            if let Err(e) = handle.await {
                warn!("Flush write task failed: {}", e);
            }
        }
        if flushed > 0 {
            info!("Flushed {} running timer(s)", flushed);
        }
        Ok(())
    }

    /// Issue a fire-and-forget store write; on failure publish a
    /// structured error event instead of surfacing it to the caller.
    fn spawn_update(&self, task_id: &str, patch: TaskPatch, report_failure: bool) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let error_tx = self.store_error_tx.clone();
        let task_id = task_id.to_string();

        tokio::spawn(async move {
            if let Err(e) = store.update(&task_id, patch.clone()).await {
                warn!("Task update failed: {}", e);
                if report_failure {
                    let event = StoreErrorEvent {
                        path: task_path(&task_id),
                        operation: StoreOperation::Update,
                        request_payload: serde_json::to_value(&patch).ok(),
                    };
                    if error_tx.send(event).is_err() {
                        debug!("No store error subscribers");
                    }
                }
            }
        })
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
