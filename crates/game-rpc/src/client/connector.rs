//! Client for a gateway's connector surface

use super::HttpChannel;
use crate::error::RpcResult;
use async_trait::async_trait;
use game_core::{ConnectorResponse, ConnectorService, KickRequest, RepoResult, SendMessageRequest};

/// Push and kick calls back into one gateway
#[derive(Debug, Clone)]
pub struct HttpConnectorClient {
    channel: HttpChannel,
}

impl HttpConnectorClient {
    pub fn connect(address: &str) -> RpcResult<Self> {
        Ok(Self {
            channel: HttpChannel::connect(address)?,
        })
    }
}

#[async_trait]
impl ConnectorService for HttpConnectorClient {
    async fn send_message(&self, request: SendMessageRequest) -> RepoResult<ConnectorResponse> {
        Ok(self.channel.post_json("/connector/send", &request).await?)
    }

    async fn kick(&self, request: KickRequest) -> RepoResult<ConnectorResponse> {
        Ok(self.channel.post_json("/connector/kick", &request).await?)
    }
}
