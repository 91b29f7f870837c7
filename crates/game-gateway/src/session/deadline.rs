//! Session deadlines
//!
//! A deadline is a spawned timer that closes the connection when it fires.
//! Cancelling or dropping it aborts the timer.

use super::Outbound;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Armed close-on-expiry timer
#[derive(Debug)]
pub struct Deadline {
    handle: JoinHandle<()>,
}

impl Deadline {
    /// Close the connection behind `sender` with `reason` once `after` elapses
    pub fn arm(
        session_id: &str,
        after: Duration,
        sender: mpsc::Sender<Outbound>,
        reason: &'static str,
    ) -> Self {
        let session_id = session_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            tracing::info!(session_id = %session_id, reason, "Deadline expired, kicking client");
            // The writer may already be gone
            let _ = sender.send(Outbound::Close(reason.to_string())).await;
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

impl Drop for Deadline {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
