//! Echo game used by the `game-demo` binary

use crate::error::FrameworkResult;
use crate::handler::GameHandler;
use crate::peer::Peer;
use async_trait::async_trait;
use std::sync::Arc;

/// Replies with every payload it receives.
///
/// With `push_copy`, each payload is also pushed through the gateway, which
/// only reaches players of a stateful instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoHandler {
    push_copy: bool,
}

impl EchoHandler {
    pub fn new(push_copy: bool) -> Self {
        Self { push_copy }
    }
}

#[async_trait]
impl GameHandler for EchoHandler {
    async fn on_join(&self, peer: &Arc<Peer>) -> FrameworkResult<()> {
        tracing::info!(
            user_id = %peer.user_id(),
            session_id = %peer.session_id(),
            balance = ?peer.balance(),
            "Player joined echo game"
        );
        Ok(())
    }

    async fn on_message(&self, peer: &Arc<Peer>, payload: &[u8]) -> FrameworkResult<Vec<u8>> {
        if self.push_copy {
            if let Err(e) = peer.send(payload.to_vec()).await {
                tracing::warn!(session_id = %peer.session_id(), error = %e, "Echo push failed");
            }
        }
        Ok(payload.to_vec())
    }
}
