//! External surfaces module
//!
//! This module contains the fire-and-forget surfaces the engine drives
//! without observing their outcome.

pub mod notifier;

// Re-export main types
pub use notifier::{Notice, Notifier};
