//! Connection teardown

use crate::router::RouteHint;
use crate::server::GatewayState;
use crate::session::{Connection, GameRoute};
use game_core::{QuitRequest, RequestHeader, ServiceKind};
use game_rpc::call_with_timeout;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Cleans up after a closed connection
pub struct DisconnectHandler;

impl DisconnectHandler {
    /// Cancel timers, notify the game of the quit and drop the session.
    ///
    /// The quit notification runs detached with its own timeout; its outcome
    /// is only logged. The handle is returned so callers can await it.
    pub async fn handle(state: &GatewayState, connection: &Arc<Connection>) -> Option<JoinHandle<()>> {
        let (user_id, binding) = {
            let mut session = connection.session();
            session.cancel_deadlines();
            (session.user_id().map(str::to_string), session.game().cloned())
        };

        let notify = match (user_id, binding) {
            (Some(user_id), Some(binding)) => {
                let endpoint = match binding.route {
                    GameRoute::Sticky { endpoint } => Some(endpoint),
                    GameRoute::Dynamic => {
                        let hint =
                            RouteHint::game(binding.game_id).with_kind(ServiceKind::Stateless);
                        match state
                            .router()
                            .route_within(&hint, state.settings().route_timeout)
                            .await
                        {
                            Ok(route) => Some(route.endpoint),
                            Err(e) => {
                                tracing::warn!(
                                    session_id = %connection.id(),
                                    game_id = binding.game_id,
                                    error = %e,
                                    "No route for quit notification"
                                );
                                None
                            }
                        }
                    }
                };
                endpoint.and_then(|endpoint| Self::notify_quit(state, connection, user_id, endpoint))
            }
            _ => None,
        };

        state.sessions().remove(connection.id());
        tracing::info!(session_id = %connection.id(), "Session closed");
        notify
    }

    fn notify_quit(
        state: &GatewayState,
        connection: &Connection,
        user_id: String,
        endpoint: String,
    ) -> Option<JoinHandle<()>> {
        let service = match state.game_pool().get_connection(&endpoint) {
            Ok(service) => service,
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Game server unreachable for quit");
                return None;
            }
        };

        let request = QuitRequest {
            header: RequestHeader::new(user_id, connection.id()),
        };
        let limit = state.settings().quit_timeout;
        let session_id = connection.id().to_string();

        Some(tokio::spawn(async move {
            match call_with_timeout(limit, "quit", service.on_player_quit(request)).await {
                Ok(response) if response.is_success() => {
                    tracing::debug!(session_id = %session_id, endpoint = %endpoint, "Quit delivered");
                }
                Ok(response) => {
                    tracing::warn!(
                        session_id = %session_id,
                        code = %response.code.as_str(),
                        error = ?response.error_message,
                        "Quit refused"
                    );
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id, error = %e, "Quit notification failed");
                }
            }
        }))
    }
}
