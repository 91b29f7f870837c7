//! A player's presence on this instance

use crate::error::FrameworkResult;
use game_core::{ConnectorService, KickRequest, SendMessageRequest, User};
use game_rpc::{call_with_timeout, ConnectorPool};
use std::sync::Arc;
use std::time::Duration;

/// Timeout applied to pushes and kicks when the caller gives none
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(3);

/// A player session, reachable through the gateway that owns its socket
pub struct Peer {
    user: User,
    /// Wallet balance when the player joined; `None` if it could not be read
    balance: Option<i64>,
    session_id: String,
    gateway_address: String,
    connectors: Arc<ConnectorPool>,
}

impl Peer {
    pub fn new(
        user: User,
        balance: Option<i64>,
        session_id: impl Into<String>,
        gateway_address: impl Into<String>,
        connectors: Arc<ConnectorPool>,
    ) -> Self {
        Self {
            user,
            balance,
            session_id: session_id.into(),
            gateway_address: gateway_address.into(),
            connectors,
        }
    }

    /// Per-call peer for stateless games, knowing only the ids
    pub fn transient(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        connectors: Arc<ConnectorPool>,
    ) -> Self {
        let user_id = user_id.into();
        Self::new(User::new(user_id.clone(), user_id), None, session_id, "", connectors)
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn balance(&self) -> Option<i64> {
        self.balance
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Connector address of the owning gateway; empty for transient peers
    pub fn gateway_address(&self) -> &str {
        &self.gateway_address
    }

    /// Push a payload to the player
    pub async fn send(&self, payload: Vec<u8>) -> FrameworkResult<()> {
        self.send_within(payload, DEFAULT_PEER_TIMEOUT).await
    }

    pub async fn send_within(&self, payload: Vec<u8>, limit: Duration) -> FrameworkResult<()> {
        let connector = self.connector()?;
        let request = SendMessageRequest {
            session_ids: vec![self.session_id.clone()],
            payload,
        };
        call_with_timeout(limit, "send", connector.send_message(request)).await?;
        Ok(())
    }

    /// Disconnect the player with a reason
    pub async fn kick(&self, reason: impl Into<String>) -> FrameworkResult<()> {
        self.kick_within(reason, DEFAULT_PEER_TIMEOUT).await
    }

    pub async fn kick_within(&self, reason: impl Into<String>, limit: Duration) -> FrameworkResult<()> {
        let connector = self.connector()?;
        let request = KickRequest {
            session_id: self.session_id.clone(),
            reason: reason.into(),
        };
        call_with_timeout(limit, "kick", connector.kick(request)).await?;
        tracing::info!(session_id = %self.session_id, user_id = %self.user.id, "Peer kicked");
        Ok(())
    }

    fn connector(&self) -> FrameworkResult<Arc<dyn ConnectorService>> {
        Ok(self.connectors.get_connection(&self.gateway_address)?)
    }
}

impl std::fmt::Debug for Peer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peer")
            .field("user_id", &self.user.id)
            .field("session_id", &self.session_id)
            .field("gateway_address", &self.gateway_address)
            .finish_non_exhaustive()
    }
}
