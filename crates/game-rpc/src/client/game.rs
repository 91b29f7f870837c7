//! Client for a game service instance

use super::HttpChannel;
use crate::error::RpcResult;
use async_trait::async_trait;
use game_core::{GameResponse, GameService, JoinRequest, MessageRequest, QuitRequest, RepoResult};

/// Join, quit, and message calls to one game instance
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    channel: HttpChannel,
}

impl HttpGameClient {
    pub fn connect(address: &str) -> RpcResult<Self> {
        Ok(Self {
            channel: HttpChannel::connect(address)?,
        })
    }
}

#[async_trait]
impl GameService for HttpGameClient {
    async fn on_player_join(&self, request: JoinRequest) -> RepoResult<GameResponse> {
        Ok(self.channel.post_json("/game/join", &request).await?)
    }

    async fn on_player_quit(&self, request: QuitRequest) -> RepoResult<GameResponse> {
        Ok(self.channel.post_json("/game/quit", &request).await?)
    }

    async fn on_message(&self, request: MessageRequest) -> RepoResult<GameResponse> {
        Ok(self.channel.post_json("/game/message", &request).await?)
    }
}
