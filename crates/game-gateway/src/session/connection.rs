//! Individual client connection

use super::{Deadline, Session};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Frame queued for the socket writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Text frame
    Text(String),
    /// Binary frame, for game payloads that are not UTF-8
    Binary(Vec<u8>),
    /// Close frame with a reason; the writer stops after sending it
    Close(String),
}

/// A single client connection
pub struct Connection {
    /// Unique session ID
    id: String,

    /// Channel to the socket writer
    sender: mpsc::Sender<Outbound>,

    /// Session state machine
    session: Mutex<Session>,

    created_at: Instant,
}

impl Connection {
    pub fn new(id: impl Into<String>, sender: mpsc::Sender<Outbound>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            sender,
            session: Mutex::new(Session::new()),
            created_at: Instant::now(),
        })
    }

    /// Generate a new session ID
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lock the session state. Never hold the guard across an `.await`.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock()
    }

    pub fn user_id(&self) -> Option<String> {
        self.session.lock().user_id().map(str::to_string)
    }

    /// Arm a deadline that closes this connection with `reason`
    pub fn deadline(&self, after: Duration, reason: &'static str) -> Deadline {
        Deadline::arm(&self.id, after, self.sender.clone(), reason)
    }

    /// Queue a text frame. Returns `false` if the writer is gone.
    pub async fn send_text(&self, text: impl Into<String>) -> bool {
        self.sender.send(Outbound::Text(text.into())).await.is_ok()
    }

    /// Queue an opaque game payload: a text frame when it is UTF-8, binary otherwise.
    /// Returns `false` if the writer is gone.
    pub async fn send_payload(&self, payload: Vec<u8>) -> bool {
        let frame = match String::from_utf8(payload) {
            Ok(text) => Outbound::Text(text),
            Err(e) => Outbound::Binary(e.into_bytes()),
        };
        self.sender.send(frame).await.is_ok()
    }

    /// Queue a close frame
    pub async fn close(&self, reason: impl Into<String>) {
        let _ = self.sender.send(Outbound::Close(reason.into())).await;
    }

    /// Queue a close frame after `grace`, letting earlier frames reach the client
    pub fn close_after(&self, grace: Duration, reason: &'static str) {
        let sender = self.sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let _ = sender.send(Outbound::Close(reason.to_string())).await;
        });
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("phase", &self.session.lock().phase())
            .field("created_at", &self.created_at)
            .finish()
    }
}
