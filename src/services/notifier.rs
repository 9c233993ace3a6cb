//! User notification surface

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// A short-lived message shown to the user
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
}

/// Fire-and-forget notification fanout.
///
/// Notices are logged and broadcast to any subscribers; delivery is not
/// acknowledged and failures are not observable by callers.
#[derive(Debug)]
pub struct Notifier {
    notice_tx: broadcast::Sender<Notice>,
}

impl Notifier {
    /// Create a notifier with a bounded broadcast buffer
    pub fn new() -> Self {
        let (notice_tx, _) = broadcast::channel(100);
        Self { notice_tx }
    }

    /// Emit a notice
    pub fn notify(&self, title: &str, description: &str) {
        info!("Notification: {} - {}", title, description);
        let notice = Notice {
            title: title.to_string(),
            description: description.to_string(),
        };
        if self.notice_tx.send(notice).is_err() {
            debug!("No notification subscribers");
        }
    }

    /// Subscribe to notices
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notice_tx.subscribe()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
