//! Forwarding of game messages

use super::{HandlerError, HandlerResult};
use crate::router::RouteHint;
use crate::server::GatewayState;
use crate::session::{Connection, GameRoute};
use game_core::{MessageRequest, RequestHeader, ServiceKind};
use game_rpc::call_with_timeout;
use std::sync::Arc;

/// Relays an opaque client frame to the session's game instance
pub struct ForwardHandler;

impl ForwardHandler {
    /// Forward `raw` verbatim. Stateful games go to the sticky instance;
    /// stateless games are re-resolved on every message.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        raw: &[u8],
    ) -> HandlerResult<()> {
        let (user_id, binding) = {
            let session = connection.session();
            (session.user_id().map(str::to_string), session.game().cloned())
        };
        let (Some(user_id), Some(binding)) = (user_id, binding) else {
            return Err(HandlerError::NoRoute);
        };

        let settings = state.settings();
        let endpoint = match binding.route {
            GameRoute::Sticky { endpoint } => endpoint,
            GameRoute::Dynamic => {
                let hint = RouteHint::game(binding.game_id).with_kind(ServiceKind::Stateless);
                state
                    .router()
                    .route_within(&hint, settings.route_timeout)
                    .await
                    .map_err(|e| {
                        tracing::warn!(
                            session_id = %connection.id(),
                            game_id = binding.game_id,
                            error = %e,
                            "Re-resolve failed"
                        );
                        HandlerError::NoRoute
                    })?
                    .endpoint
            }
        };

        let service = state
            .game_pool()
            .get_connection(&endpoint)
            .map_err(HandlerError::BackendConnectionFailed)?;

        tracing::trace!(
            session_id = %connection.id(),
            endpoint = %endpoint,
            bytes = raw.len(),
            "Forwarding message"
        );

        let request = MessageRequest {
            header: RequestHeader::new(user_id, connection.id()),
            payload: raw.to_vec(),
        };
        let response = call_with_timeout(settings.message_timeout, "message", service.on_message(request))
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %endpoint, error = %e, "Message call failed");
                HandlerError::GameServerError(e.to_string())
            })?;

        if !response.payload.is_empty() {
            if !connection.send_payload(response.payload).await {
                tracing::debug!(session_id = %connection.id(), "Game reply dropped, writer closed");
            }
        } else if !response.is_success() {
            return Err(HandlerError::GameServerError(
                response.error_message.unwrap_or_default(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::MessageDispatcher;
    use crate::router::RegistryDiscovery;
    use crate::session::Outbound;
    use game_core::{ServiceKind, ServiceRoute};
    use serde_json::json;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    async fn in_game(
        harness: &Harness,
        game_id: i32,
    ) -> (Arc<crate::session::Connection>, mpsc::Receiver<Outbound>) {
        let (conn, mut rx) = harness.connect("s1");
        MessageDispatcher::dispatch(
            &harness.state,
            &conn,
            br#"{"action":"login","payload":{"token":"t1"}}"#,
        )
        .await;
        next_json(&mut rx);
        let enter = json!({"action": "enterGame", "payload": {"game_id": game_id}}).to_string();
        MessageDispatcher::dispatch(&harness.state, &conn, enter.as_bytes()).await;
        assert_eq!(next_json(&mut rx)["data"]["success"], true);
        (conn, rx)
    }

    #[tokio::test]
    async fn test_forward_sticky_echo() {
        let harness = Harness::new();
        let (conn, mut rx) = in_game(&harness, STATEFUL_GAME).await;

        let frame = br#"{"action":"spin","payload":{"bet":10}}"#;
        MessageDispatcher::dispatch(&harness.state, &conn, frame).await;

        assert_eq!(
            rx.try_recv(),
            Ok(Outbound::Text(String::from_utf8(frame.to_vec()).unwrap()))
        );
        let messages = harness.game("sticky:1").messages.lock();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].payload, frame.to_vec());
        assert_eq!(messages[0].header.user_id, "u1");
    }

    #[tokio::test]
    async fn test_forward_dynamic_re_resolves() {
        let harness = Harness::new();
        let (conn, mut rx) = in_game(&harness, STATELESS_GAME).await;

        for _ in 0..3 {
            MessageDispatcher::dispatch(&harness.state, &conn, br#"{"action":"spin"}"#).await;
            assert!(matches!(rx.try_recv(), Ok(Outbound::Text(_))));
        }
        assert_eq!(harness.game("dynamic:1").messages.lock().len(), 3);
    }

    fn registry_harness(lookup: Arc<RotatingLookup>) -> Harness {
        Harness::with_endpoints(Arc::new(RegistryDiscovery::new(lookup)), &["a:1", "b:1"])
    }

    #[tokio::test]
    async fn test_sticky_target_survives_registry_change() {
        let lookup = RotatingLookup::serving(vec![ServiceRoute::new("a:1", ServiceKind::Stateful)]);
        let harness = registry_harness(lookup.clone());
        let (conn, mut rx) = in_game(&harness, 7).await;

        lookup.replace(vec![ServiceRoute::new("b:1", ServiceKind::Stateful)]);
        for _ in 0..5 {
            MessageDispatcher::dispatch(&harness.state, &conn, br#"{"action":"spin"}"#).await;
            assert!(matches!(rx.try_recv(), Ok(Outbound::Text(_))));
        }

        assert_eq!(harness.game("a:1").messages.lock().len(), 5);
        assert!(harness.game("b:1").messages.lock().is_empty());
    }

    #[tokio::test]
    async fn test_stateless_messages_spread_over_instances() {
        let lookup = RotatingLookup::serving(vec![
            ServiceRoute::new("a:1", ServiceKind::Stateless),
            ServiceRoute::new("b:1", ServiceKind::Stateless),
        ]);
        let harness = registry_harness(lookup);
        let (conn, mut rx) = in_game(&harness, 7).await;

        for _ in 0..6 {
            MessageDispatcher::dispatch(&harness.state, &conn, br#"{"action":"spin"}"#).await;
            assert!(matches!(rx.try_recv(), Ok(Outbound::Text(_))));
        }

        assert_eq!(harness.game("a:1").messages.lock().len(), 3);
        assert_eq!(harness.game("b:1").messages.lock().len(), 3);
    }

    #[tokio::test]
    async fn test_reply_to_closed_writer_is_dropped() {
        let harness = Harness::new();
        let (conn, rx) = in_game(&harness, STATEFUL_GAME).await;
        drop(rx);

        let result =
            super::ForwardHandler::handle(&harness.state, &conn, br#"{"action":"spin"}"#).await;

        assert!(result.is_ok());
        assert_eq!(harness.game("sticky:1").messages.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_forward_empty_replies() {
        let harness = Harness::new();
        let (conn, mut rx) = in_game(&harness, STATEFUL_GAME).await;

        MessageDispatcher::dispatch(&harness.state, &conn, br#"{"action":"silent"}"#).await;
        assert!(rx.try_recv().is_err());

        MessageDispatcher::dispatch(&harness.state, &conn, br#"{"action":"fail"}"#).await;
        assert_eq!(
            next_json(&mut rx),
            json!({"action": "forward", "error": "Game Server Error: bad move"})
        );
        assert!(rx.try_recv().is_err());
    }
}
