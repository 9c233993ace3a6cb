//! TaskFlow Timer - a state-managed timer engine server for task and
//! habit time tracking
//!
//! This library provides a per-task timer registry (stopwatch, countdown
//! and pomodoro modes) with durable time accounting into a task document
//! store, a 1-second tick driver, and a document title surface, exposed
//! over a small HTTP API.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::shutdown_signal;
