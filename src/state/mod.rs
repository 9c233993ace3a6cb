//! State management module
//!
//! This module contains the timer registry, per-task timer state, and the
//! document title surface.

pub mod app_state;
pub mod timer_state;
pub mod title;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{PomodoroPhase, PomodoroSettings, TimerMode, TimerState};
pub use title::{TitleAnnouncer, NEUTRAL_TITLE};
