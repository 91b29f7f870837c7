//! Game logic callbacks

use crate::error::FrameworkResult;
use crate::peer::Peer;
use async_trait::async_trait;
use std::sync::Arc;

/// Game-specific logic run by [`GameServer`](crate::GameServer).
///
/// Every method has a no-op default, so a game implements only what it needs.
#[async_trait]
pub trait GameHandler: Send + Sync {
    /// A player entered. An error refuses the join.
    async fn on_join(&self, _peer: &Arc<Peer>) -> FrameworkResult<()> {
        Ok(())
    }

    /// A player left. Errors are logged only.
    async fn on_quit(&self, _peer: &Arc<Peer>) -> FrameworkResult<()> {
        Ok(())
    }

    /// A client message. The returned bytes go back to the player; empty means no reply.
    async fn on_message(&self, _peer: &Arc<Peer>, _payload: &[u8]) -> FrameworkResult<Vec<u8>> {
        Ok(Vec::new())
    }
}
