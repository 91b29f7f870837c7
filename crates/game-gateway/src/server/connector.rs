//! Connector surface
//!
//! Game instances push messages to sessions and kick them through these
//! routes, served on the gateway's internal listener.

use crate::session::SessionTable;
use async_trait::async_trait;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use game_core::{
    ConnectorResponse, ConnectorService, KickRequest, RepoResult, ResultCode, SendMessageRequest,
};
use std::sync::Arc;

/// In-process connector over the session table
#[derive(Debug, Clone)]
pub struct GatewayConnector {
    sessions: Arc<SessionTable>,
}

impl GatewayConnector {
    pub fn new(sessions: Arc<SessionTable>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl ConnectorService for GatewayConnector {
    /// Push to every listed session; unknown ids are skipped
    async fn send_message(&self, request: SendMessageRequest) -> RepoResult<ConnectorResponse> {
        for session_id in &request.session_ids {
            match self.sessions.get(session_id) {
                Some(connection) => {
                    if !connection.send_payload(request.payload.clone()).await {
                        tracing::debug!(session_id = %session_id, "Push dropped, writer closed");
                    }
                }
                None => {
                    tracing::warn!(session_id = %session_id, "Push to unknown session skipped");
                }
            }
        }

        Ok(ConnectorResponse::ok())
    }

    /// Close a session; a session that is already gone counts as kicked
    async fn kick(&self, request: KickRequest) -> RepoResult<ConnectorResponse> {
        match self.sessions.get(&request.session_id) {
            Some(connection) => {
                tracing::info!(
                    session_id = %request.session_id,
                    reason = %request.reason,
                    "Kick requested by game server"
                );
                connection.close(request.reason).await;
            }
            None => {
                tracing::debug!(session_id = %request.session_id, "Kick for unknown session");
            }
        }

        Ok(ConnectorResponse::ok())
    }
}

/// Create the connector router
pub fn create_connector_router() -> Router<Arc<GatewayConnector>> {
    Router::new()
        .route("/connector/send", post(send_message))
        .route("/connector/kick", post(kick))
        .route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}

/// POST /connector/send
async fn send_message(
    State(connector): State<Arc<GatewayConnector>>,
    Json(request): Json<SendMessageRequest>,
) -> Json<ConnectorResponse> {
    Json(reply(connector.send_message(request).await))
}

/// POST /connector/kick
async fn kick(
    State(connector): State<Arc<GatewayConnector>>,
    Json(request): Json<KickRequest>,
) -> Json<ConnectorResponse> {
    Json(reply(connector.kick(request).await))
}

fn reply(result: RepoResult<ConnectorResponse>) -> ConnectorResponse {
    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Connector call failed");
        ConnectorResponse {
            code: ResultCode::ServerError,
        }
    })
}
