//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{PomodoroPhase, PomodoroSettings, TimerMode, TimerState},
    utils::format_time,
};

/// View of a task's timer returned by the timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub mode: TimerMode,
    pub is_running: bool,
    /// Current display value in seconds
    pub time: u64,
    pub formatted_time: String,
    pub initial_duration: u64,
    /// Completion percentage of the current countdown or pomodoro phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pomodoro_state: Option<PomodoroPhase>,
    pub current_cycle: u64,
    pub pomodoro_settings: PomodoroSettings,
}

impl TimerView {
    /// Build a view from an engine snapshot (display value already derived)
    pub fn from_state(state: &TimerState) -> Self {
        let progress = match state.mode {
            TimerMode::Stopwatch => None,
            TimerMode::Countdown | TimerMode::Pomodoro => {
                if state.initial_duration > 0 {
                    Some(100.0 - (state.time as f64 / state.initial_duration as f64) * 100.0)
                } else {
                    None
                }
            }
        };
        let pomodoro_state = match state.mode {
            TimerMode::Pomodoro => Some(state.pomodoro_phase),
            _ => None,
        };

        Self {
            mode: state.mode,
            is_running: state.is_running,
            time: state.time,
            formatted_time: format_time(state.time),
            initial_duration: state.initial_duration,
            progress,
            pomodoro_state,
            current_cycle: state.current_cycle,
            pomodoro_settings: state.pomodoro_settings,
        }
    }
}

/// Response for the timer lifecycle endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerActionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerView>,
}

impl TimerActionResponse {
    /// Create a response whose status reflects the timer's state
    pub fn new(message: String, timer: Option<TimerView>) -> Self {
        let status = match &timer {
            Some(view) if view.is_running => "running",
            Some(_) => "paused",
            None => "idle",
        };
        Self {
            status: status.to_string(),
            message,
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Engine status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Task currently mirrored into the document title, if any
    pub focused_task: Option<String>,
    /// Current document title value
    pub document_title: String,
    /// Number of timers currently running
    pub running_timers: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
