//! Test fixtures
//!
//! Seeded accounts and a game handler that records what the gateway sent it.

use std::sync::Arc;

use async_trait::async_trait;
use game_cache::MemoryUserStore;
use game_core::User;
use game_framework::{FrameworkError, FrameworkResult, GameHandler, Peer};
use parking_lot::Mutex;
use serde_json::Value;

/// Login token of the seeded player
pub const TOKEN: &str = "t1";
/// ID of the seeded player
pub const USER_ID: &str = "u1";
/// Nickname of the seeded player
pub const NICKNAME: &str = "alice";

/// Action that makes [`RecordingHandler`] kick the sender through the gateway
pub const KICK_ACTION: &str = "kick";
/// Action that makes [`RecordingHandler`] push a copy before replying
pub const PUSH_ACTION: &str = "push";
/// Action that makes [`RecordingHandler`] fail
pub const FAIL_ACTION: &str = "fail";

/// Reason attached to kicks issued by [`RecordingHandler`]
pub const KICK_REASON: &str = "Kicked by game";

/// A user directory holding the seeded player
pub fn seeded_users() -> MemoryUserStore {
    MemoryUserStore::new().with_user(TOKEN, User::new(USER_ID, NICKNAME))
}

/// Echoes messages and records joins and quits.
///
/// Forwarded frames arrive as the raw client envelope; the `action` field
/// selects the special behaviors above.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    joins: Mutex<Vec<String>>,
    quits: Mutex<Vec<String>>,
}

impl RecordingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn joins(&self) -> Vec<String> {
        self.joins.lock().clone()
    }

    pub fn quits(&self) -> Vec<String> {
        self.quits.lock().clone()
    }
}

#[async_trait]
impl GameHandler for RecordingHandler {
    async fn on_join(&self, peer: &Arc<Peer>) -> FrameworkResult<()> {
        self.joins.lock().push(peer.user_id().to_string());
        Ok(())
    }

    async fn on_quit(&self, peer: &Arc<Peer>) -> FrameworkResult<()> {
        self.quits.lock().push(peer.user_id().to_string());
        Ok(())
    }

    async fn on_message(&self, peer: &Arc<Peer>, payload: &[u8]) -> FrameworkResult<Vec<u8>> {
        let action = serde_json::from_slice::<Value>(payload)
            .ok()
            .and_then(|frame| frame["action"].as_str().map(str::to_string))
            .unwrap_or_default();

        match action.as_str() {
            KICK_ACTION => {
                peer.kick(KICK_REASON).await?;
                Ok(Vec::new())
            }
            PUSH_ACTION => {
                peer.send(payload.to_vec()).await?;
                Ok(payload.to_vec())
            }
            FAIL_ACTION => Err(FrameworkError::handler("bad move")),
            _ => Ok(payload.to_vec()),
        }
    }
}
