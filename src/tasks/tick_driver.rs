//! Timer tick driver background task

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{error, info};

use crate::state::AppState;

/// Background task driving the 1-second timer cadence for the lifetime
/// of the process.
///
/// Each tick runs one engine step: countdown expiry, pomodoro phase
/// transitions, and title mirroring. All time-based mutation flows
/// through this single consumer.
pub async fn tick_driver_task(state: Arc<AppState>) {
    info!("Starting timer tick driver");

    let mut interval = interval(Duration::from_secs(1));

    loop {
        interval.tick().await;

        if let Err(e) = state.tick() {
            error!("Timer tick failed: {}", e);
        }
    }
}
