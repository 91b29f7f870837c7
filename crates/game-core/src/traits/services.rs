//! Remote service ports
//!
//! Each trait is one RPC surface. The registry, gateway, and game servers
//! implement them locally; `game-rpc` implements them over HTTP.

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::{GameId, ServiceRoute};
use crate::rpc::{
    ConnectorResponse, GameResponse, JoinRequest, KickRequest, LoginResponse, MessageRequest,
    QuitRequest, RegisterRequest, RegisterResponse, SendMessageRequest,
};

/// Lease lifecycle calls made by a backend instance's registrar
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn register(&self, request: RegisterRequest) -> RepoResult<RegisterResponse>;

    /// `Ok(false)` means the lease is gone and the caller must register again
    async fn heartbeat(&self, lease_id: &str, load: i64) -> RepoResult<bool>;

    async fn deregister(&self, lease_id: &str) -> RepoResult<bool>;
}

/// Game ID to live instance lookup
#[async_trait]
pub trait RouteLookup: Send + Sync {
    /// `Ok(None)` when no instance is currently indexed for the game
    async fn get_route(&self, game_id: GameId) -> RepoResult<Option<ServiceRoute>>;
}

/// Token login
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Rejections come back as `success == false`; `Err` means the call itself failed
    async fn login(&self, token: &str) -> RepoResult<LoginResponse>;
}

/// Calls a gateway makes into a game instance
#[async_trait]
pub trait GameService: Send + Sync {
    async fn on_player_join(&self, request: JoinRequest) -> RepoResult<GameResponse>;

    async fn on_player_quit(&self, request: QuitRequest) -> RepoResult<GameResponse>;

    async fn on_message(&self, request: MessageRequest) -> RepoResult<GameResponse>;
}

/// Calls a game instance makes back into a gateway
#[async_trait]
pub trait ConnectorService: Send + Sync {
    /// Unknown session IDs are skipped
    async fn send_message(&self, request: SendMessageRequest) -> RepoResult<ConnectorResponse>;

    /// Kicking an unknown session succeeds
    async fn kick(&self, request: KickRequest) -> RepoResult<ConnectorResponse>;
}
