//! Client for the central registry

use super::HttpChannel;
use crate::error::RpcResult;
use async_trait::async_trait;
use game_core::{
    Authenticator, DeregisterRequest, DeregisterResponse, GameId, HeartbeatRequest,
    HeartbeatResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    RegistryApi, RepoResult, RouteLookup, RouteRequest, ServiceRoute,
};

/// Registry, route, and login calls to the central service
#[derive(Debug, Clone)]
pub struct CentralClient {
    channel: HttpChannel,
}

impl CentralClient {
    pub fn connect(address: &str) -> RpcResult<Self> {
        Ok(Self {
            channel: HttpChannel::connect(address)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.channel.base_url()
    }
}

#[async_trait]
impl RegistryApi for CentralClient {
    async fn register(&self, request: RegisterRequest) -> RepoResult<RegisterResponse> {
        Ok(self.channel.post_json("/registry/register", &request).await?)
    }

    async fn heartbeat(&self, lease_id: &str, load: i64) -> RepoResult<bool> {
        let request = HeartbeatRequest {
            lease_id: lease_id.to_string(),
            load,
        };
        let response: HeartbeatResponse =
            self.channel.post_json("/registry/heartbeat", &request).await?;
        Ok(response.success)
    }

    async fn deregister(&self, lease_id: &str) -> RepoResult<bool> {
        let request = DeregisterRequest {
            lease_id: lease_id.to_string(),
        };
        let response: DeregisterResponse =
            self.channel.post_json("/registry/deregister", &request).await?;
        Ok(response.success)
    }
}

#[async_trait]
impl RouteLookup for CentralClient {
    async fn get_route(&self, game_id: GameId) -> RepoResult<Option<ServiceRoute>> {
        Ok(self
            .channel
            .post_json_optional("/registry/route", &RouteRequest { game_id })
            .await?)
    }
}

#[async_trait]
impl Authenticator for CentralClient {
    async fn login(&self, token: &str) -> RepoResult<LoginResponse> {
        let request = LoginRequest {
            token: token.to_string(),
        };
        Ok(self.channel.post_json("/auth/login", &request).await?)
    }
}
