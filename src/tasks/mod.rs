//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod error_listener;
pub mod tick_driver;

// Re-export main functions
pub use error_listener::store_error_listener_task;
pub use tick_driver::tick_driver_task;
