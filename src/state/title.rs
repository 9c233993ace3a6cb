//! Document title surface

use tokio::sync::watch;

/// Title shown whenever no timer is focused
pub const NEUTRAL_TITLE: &str = "TaskFlow";

/// Exclusive owner of the global document title string.
///
/// Backed by a watch channel so any number of consumers can mirror the
/// title; writes that would not change the value are suppressed, making
/// the neutral restore happen exactly once.
#[derive(Debug)]
pub struct TitleAnnouncer {
    title_tx: watch::Sender<String>,
    /// Keep the receiver alive to prevent channel closure
    _title_rx: watch::Receiver<String>,
}

impl TitleAnnouncer {
    /// Create an announcer showing the neutral title
    pub fn new() -> Self {
        let (title_tx, title_rx) = watch::channel(NEUTRAL_TITLE.to_string());
        Self {
            title_tx,
            _title_rx: title_rx,
        }
    }

    /// Mirror a timer value into the title
    pub fn announce(&self, text: String) {
        self.title_tx.send_if_modified(|title| {
            if *title != text {
                *title = text;
                true
            } else {
                false
            }
        });
    }

    /// Restore the neutral title
    pub fn clear(&self) {
        self.announce(NEUTRAL_TITLE.to_string());
    }

    /// Current title value
    pub fn current(&self) -> String {
        self.title_tx.borrow().clone()
    }

    /// Subscribe to title changes
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.title_tx.subscribe()
    }
}

impl Default for TitleAnnouncer {
    fn default() -> Self {
        Self::new()
    }
}
