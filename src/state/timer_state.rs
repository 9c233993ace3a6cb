//! Timer state structures and mode transition logic

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Timer operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Counts elapsed seconds up from the task's accumulated time
    Stopwatch,
    /// Counts down from a configured duration
    Countdown,
    /// Alternates work and break phases, counting each phase down
    Pomodoro,
}

/// Phase of a pomodoro cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Work,
    ShortBreak,
    LongBreak,
}

/// Pomodoro durations (minutes) and cycle count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    /// Work segment length in minutes
    pub work_duration: u64,
    /// Short break length in minutes
    pub short_break_duration: u64,
    /// Long break length in minutes
    pub long_break_duration: u64,
    /// Work segments per long-break cycle
    pub cycles: u64,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            cycles: 4,
        }
    }
}

impl PomodoroSettings {
    /// Resolve a task's optional settings against the global defaults.
    ///
    /// The single merge point for absent settings; the resolved copy is
    /// captured into the timer at start so later edits on the task do not
    /// retroactively alter a running timer.
    pub fn resolve(task_settings: Option<&PomodoroSettings>, defaults: &PomodoroSettings) -> Self {
        task_settings.copied().unwrap_or(*defaults)
    }

    /// Seconds in the given phase
    pub fn phase_seconds(&self, phase: PomodoroPhase) -> u64 {
        let minutes = match phase {
            PomodoroPhase::Work => self.work_duration,
            PomodoroPhase::ShortBreak => self.short_break_duration,
            PomodoroPhase::LongBreak => self.long_break_duration,
        };
        minutes * 60
    }
}

/// Per-task timer state
///
/// `time` is only authoritative at segment boundaries: while the timer is
/// running the current display value is derived from `start_time`, never
/// mutated by ticks, so reads stay correct between ticks and a missed
/// tick can never double-count.
#[derive(Debug, Clone)]
pub struct TimerState {
    pub mode: TimerMode,
    pub is_running: bool,
    /// Displayed seconds at the last segment boundary: remaining for
    /// countdown and pomodoro phases, elapsed total for stopwatch
    pub time: u64,
    /// Instant the current running segment began; `None` while paused
    pub start_time: Option<Instant>,
    /// Durable elapsed-seconds baseline at the start of the current
    /// segment; advanced only by committed accounting events
    pub initial_time_spent: u64,
    /// Configured length (seconds) of the current countdown or pomodoro
    /// phase, for progress computation
    pub initial_duration: u64,
    pub pomodoro_phase: PomodoroPhase,
    /// 1-based count of the work segment currently in progress
    pub current_cycle: u64,
    pub pomodoro_settings: PomodoroSettings,
}

impl TimerState {
    /// Seed a stopwatch from the task's persisted accumulated time
    pub fn stopwatch(time_spent: u64, settings: PomodoroSettings, now: Instant) -> Self {
        Self {
            mode: TimerMode::Stopwatch,
            is_running: true,
            time: time_spent,
            start_time: Some(now),
            initial_time_spent: time_spent,
            initial_duration: 0,
            pomodoro_phase: PomodoroPhase::Work,
            current_cycle: 1,
            pomodoro_settings: settings,
        }
    }

    /// Seed a countdown of the given length in seconds
    pub fn countdown(
        duration_seconds: u64,
        time_spent: u64,
        settings: PomodoroSettings,
        now: Instant,
    ) -> Self {
        Self {
            mode: TimerMode::Countdown,
            is_running: true,
            time: duration_seconds,
            start_time: Some(now),
            initial_time_spent: time_spent,
            initial_duration: duration_seconds,
            pomodoro_phase: PomodoroPhase::Work,
            current_cycle: 1,
            pomodoro_settings: settings,
        }
    }

    /// Seed a pomodoro timer at the first work phase
    pub fn pomodoro(time_spent: u64, settings: PomodoroSettings, now: Instant) -> Self {
        let work_seconds = settings.phase_seconds(PomodoroPhase::Work);
        Self {
            mode: TimerMode::Pomodoro,
            is_running: true,
            time: work_seconds,
            start_time: Some(now),
            initial_time_spent: time_spent,
            initial_duration: work_seconds,
            pomodoro_phase: PomodoroPhase::Work,
            current_cycle: 1,
            pomodoro_settings: settings,
        }
    }

    /// Whole seconds elapsed in the current running segment
    pub fn elapsed_seconds(&self, now: Instant) -> u64 {
        self.start_time
            .map(|start| now.saturating_duration_since(start).as_secs())
            .unwrap_or(0)
    }

    /// Current display value in seconds, derived on demand.
    ///
    /// Idempotent and side-effect-free; callers may invoke it every
    /// render frame. Clamped at zero for the counting-down modes.
    pub fn display_time(&self, now: Instant) -> u64 {
        if !self.is_running {
            return self.time;
        }
        let elapsed = self.elapsed_seconds(now);
        match self.mode {
            TimerMode::Stopwatch => self.initial_time_spent + elapsed,
            TimerMode::Countdown | TimerMode::Pomodoro => self.time.saturating_sub(elapsed),
        }
    }

    /// Whether the running phase has counted down to zero
    pub fn is_expired(&self, now: Instant) -> bool {
        match self.mode {
            TimerMode::Stopwatch => false,
            TimerMode::Countdown | TimerMode::Pomodoro => {
                self.is_running && self.display_time(now) == 0
            }
        }
    }

    /// Close the current running segment and commit its accounting.
    ///
    /// Returns the new durable total if this segment advanced it
    /// (stopwatch and pomodoro work accrue literal elapsed seconds;
    /// countdown and pomodoro breaks are ephemeral).
    pub fn pause_segment(&mut self, now: Instant) -> Option<u64> {
        let elapsed = self.elapsed_seconds(now);
        let committed = match (self.mode, self.pomodoro_phase) {
            (TimerMode::Stopwatch, _) => {
                self.initial_time_spent += elapsed;
                self.time = self.initial_time_spent;
                Some(self.initial_time_spent)
            }
            (TimerMode::Pomodoro, PomodoroPhase::Work) => {
                self.initial_time_spent += elapsed;
                self.time = self.time.saturating_sub(elapsed);
                Some(self.initial_time_spent)
            }
            (TimerMode::Countdown, _) | (TimerMode::Pomodoro, _) => {
                self.time = self.time.saturating_sub(elapsed);
                None
            }
        };
        self.is_running = false;
        self.start_time = None;
        committed
    }

    /// Advance an expired pomodoro phase to the next one.
    ///
    /// A completed work segment credits the nominal configured duration
    /// (expiry is only detected at 1-second granularity, so the planned
    /// length is the contract) and returns the new durable total. The
    /// short-vs-long decision reads the cycle counter before it is
    /// incremented; breaks do not touch the counter.
    pub fn advance_pomodoro_phase(&mut self, now: Instant) -> Option<u64> {
        let settings = self.pomodoro_settings;
        let committed = match self.pomodoro_phase {
            PomodoroPhase::Work => {
                self.initial_time_spent += settings.phase_seconds(PomodoroPhase::Work);
                let long_break = self.current_cycle % settings.cycles == 0;
                self.current_cycle += 1;
                self.pomodoro_phase = if long_break {
                    PomodoroPhase::LongBreak
                } else {
                    PomodoroPhase::ShortBreak
                };
                Some(self.initial_time_spent)
            }
            PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak => {
                self.pomodoro_phase = PomodoroPhase::Work;
                None
            }
        };
        self.time = settings.phase_seconds(self.pomodoro_phase);
        self.initial_duration = self.time;
        self.start_time = Some(now);
        committed
    }

    /// Completion fraction (0–100) of the current countdown or pomodoro
    /// phase; `None` for stopwatches
    pub fn progress_percent(&self, now: Instant) -> Option<f64> {
        match self.mode {
            TimerMode::Stopwatch => None,
            TimerMode::Countdown | TimerMode::Pomodoro => {
                if self.initial_duration == 0 {
                    return None;
                }
                let time = self.display_time(now) as f64;
                Some(100.0 - (time / self.initial_duration as f64) * 100.0)
            }
        }
    }
}
