use std::time::Duration;
use tokio::task::JoinHandle;

use super::event::{ConsoleEvent, EventSender};

/// An event posted to the console after a delay.
///
/// Dropping the handle cancels the action, so a torn-down component never
/// receives its own stale expiry.
#[derive(Debug)]
pub struct DelayedAction {
    handle: JoinHandle<()>,
}

impl DelayedAction {
    pub fn schedule(delay: Duration, events: &EventSender, event: ConsoleEvent) -> Self {
        let events = events.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the console is shutting down
            let _ = events.send(event);
        });
        Self { handle }
    }

    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for DelayedAction {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
