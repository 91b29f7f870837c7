//! Session table
//!
//! All live connections by session ID, using `DashMap` for concurrent access.

use super::Connection;
use dashmap::DashMap;
use std::sync::Arc;

/// Live connections by session ID
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: DashMap<String, Arc<Connection>>,
}

impl SessionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a connection. Re-adding an ID replaces the old entry.
    pub fn add(&self, connection: Arc<Connection>) {
        let id = connection.id().to_string();
        self.sessions.insert(id.clone(), connection);
        tracing::debug!(session_id = %id, "Session added");
    }

    pub fn remove(&self, session_id: &str) -> Option<Arc<Connection>> {
        let removed = self.sessions.remove(session_id).map(|(_, conn)| conn);
        if removed.is_some() {
            tracing::debug!(session_id = %session_id, "Session removed");
        }
        removed
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Connection>> {
        self.sessions.get(session_id).map(|r| r.clone())
    }

    /// Number of live sessions
    pub fn count(&self) -> usize {
        self.sessions.len()
    }

    /// Snapshot of every live connection
    pub fn connections(&self) -> Vec<Arc<Connection>> {
        self.sessions.iter().map(|r| r.value().clone()).collect()
    }
}
