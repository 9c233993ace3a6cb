//! Store error listener background task

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::AppState;

/// Background task that consumes store write failure events and logs
/// them for operator visibility.
///
/// The engine only publishes to the error channel; this is its default
/// downstream consumer.
pub async fn store_error_listener_task(state: Arc<AppState>) {
    info!("Starting store error listener");

    let mut error_rx = state.store_error_tx.subscribe();

    loop {
        match error_rx.recv().await {
            Ok(event) => {
                let payload = event
                    .request_payload
                    .as_ref()
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "none".to_string());
                error!(
                    "Store write failed: path={}, operation={:?}, payload={}",
                    event.path, event.operation, payload
                );
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Store error listener lagged, {} events dropped", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Store error channel closed, stopping listener");
                break;
            }
        }
    }
}
