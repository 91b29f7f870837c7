//! Player lifecycle around a [`GameHandler`]

use crate::error::{FrameworkError, FrameworkResult};
use crate::handler::GameHandler;
use crate::peer::{Peer, PeerManager};
use async_trait::async_trait;
use game_core::{
    GameResponse, GameService, JoinRequest, MessageRequest, QuitRequest, RepoResult, ServiceKind,
    User, UserDirectory, Wallet,
};
use game_rpc::ConnectorPool;
use std::sync::Arc;

/// Game backend instance.
///
/// Stateful instances keep one [`Peer`] per session from join to quit.
/// Stateless instances build a transient peer for every call.
pub struct GameServer {
    service_name: String,
    kind: ServiceKind,
    handler: Arc<dyn GameHandler>,
    peers: PeerManager,
    users: Arc<dyn UserDirectory>,
    wallet: Arc<dyn Wallet>,
    connectors: Arc<ConnectorPool>,
}

impl GameServer {
    pub fn new(
        service_name: impl Into<String>,
        kind: ServiceKind,
        handler: Arc<dyn GameHandler>,
        users: Arc<dyn UserDirectory>,
        wallet: Arc<dyn Wallet>,
        connectors: Arc<ConnectorPool>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            kind,
            handler,
            peers: PeerManager::new(),
            users,
            wallet,
            connectors,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// Registered peers; always empty for stateless instances
    pub fn peers(&self) -> &PeerManager {
        &self.peers
    }

    async fn join(&self, request: JoinRequest) -> FrameworkResult<()> {
        let user_id = &request.header.user_id;
        let session_id = &request.header.session_id;

        let user: User = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| FrameworkError::UserNotFound(user_id.clone()))?;

        let balance = match self.wallet.get_balance(user_id).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Balance unavailable at join");
                None
            }
        };

        let peer = Arc::new(Peer::new(
            user,
            balance,
            session_id.as_str(),
            request.gateway_address.as_str(),
            self.connectors.clone(),
        ));

        if self.kind.is_stateful() {
            self.peers.add(peer.clone());
        }

        if let Err(e) = self.handler.on_join(&peer).await {
            if self.kind.is_stateful() {
                self.peers.remove(session_id);
            }
            return Err(e);
        }
        Ok(())
    }

    fn peer_for(&self, user_id: &str, session_id: &str) -> FrameworkResult<Arc<Peer>> {
        match self.kind {
            ServiceKind::Stateful => self
                .peers
                .get(session_id)
                .ok_or_else(|| FrameworkError::PeerNotFound(session_id.to_string())),
            ServiceKind::Stateless => Ok(Arc::new(Peer::transient(
                user_id,
                session_id,
                self.connectors.clone(),
            ))),
        }
    }

    async fn quit(&self, request: QuitRequest) -> FrameworkResult<()> {
        let session_id = &request.header.session_id;
        let peer = self.peer_for(&request.header.user_id, session_id)?;

        if let Err(e) = self.handler.on_quit(&peer).await {
            tracing::warn!(session_id = %session_id, error = %e, "Quit handler failed");
        }

        if self.kind.is_stateful() {
            self.peers.remove(session_id);
        }
        Ok(())
    }

    async fn message(&self, request: MessageRequest) -> FrameworkResult<Vec<u8>> {
        let peer = self.peer_for(&request.header.user_id, &request.header.session_id)?;
        self.handler.on_message(&peer, &request.payload).await
    }
}

fn failure(err: &FrameworkError) -> GameResponse {
    GameResponse::error(err.result_code(), err.to_string())
}

#[async_trait]
impl GameService for GameServer {
    async fn on_player_join(&self, request: JoinRequest) -> RepoResult<GameResponse> {
        let user_id = request.header.user_id.clone();
        let session_id = request.header.session_id.clone();
        tracing::info!(
            service = %self.service_name,
            user_id = %user_id,
            session_id = %session_id,
            "Player joining"
        );

        Ok(match self.join(request).await {
            Ok(()) => GameResponse::ok(),
            Err(e) => {
                tracing::warn!(user_id = %user_id, session_id = %session_id, error = %e, "Join refused");
                failure(&e)
            }
        })
    }

    async fn on_player_quit(&self, request: QuitRequest) -> RepoResult<GameResponse> {
        let session_id = request.header.session_id.clone();
        tracing::info!(service = %self.service_name, session_id = %session_id, "Player quitting");

        Ok(match self.quit(request).await {
            Ok(()) => GameResponse::ok(),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Quit failed");
                failure(&e)
            }
        })
    }

    async fn on_message(&self, request: MessageRequest) -> RepoResult<GameResponse> {
        let session_id = request.header.session_id.clone();
        tracing::trace!(session_id = %session_id, bytes = request.payload.len(), "Message received");

        Ok(match self.message(request).await {
            Ok(payload) => GameResponse::with_payload(payload),
            Err(e) => {
                tracing::debug!(session_id = %session_id, error = %e, "Message failed");
                failure(&e)
            }
        })
    }
}

impl std::fmt::Debug for GameServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameServer")
            .field("service_name", &self.service_name)
            .field("kind", &self.kind)
            .field("peers", &self.peers.len())
            .finish_non_exhaustive()
    }
}
