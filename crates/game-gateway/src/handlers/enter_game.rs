//! `enterGame` handler

use super::{send_envelope, HandlerError, HandlerResult};
use crate::protocol::{actions, ClientEnvelope, EnterGamePayload, EnterGameReply, ServerEnvelope};
use crate::router::RouteHint;
use crate::server::GatewayState;
use crate::session::{Connection, GameBinding};
use game_core::{JoinRequest, RequestHeader};
use game_rpc::call_with_timeout;
use std::sync::Arc;

/// Places an authenticated session into a game.
///
/// The binding is committed only after the instance accepts the join, so any
/// failure leaves the session out of game and the client may retry.
pub struct EnterGameHandler;

impl EnterGameHandler {
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        envelope: &ClientEnvelope,
    ) -> HandlerResult<()> {
        if connection.session().game().is_some() {
            return Err(HandlerError::AlreadyInGame);
        }

        let payload: EnterGamePayload = envelope
            .payload_as()
            .map_err(|e| HandlerError::InvalidEnterGamePayload(e.to_string()))?;

        let Some(user_id) = connection.user_id() else {
            return Err(HandlerError::NotLoggedIn);
        };

        let settings = state.settings();
        let game_id = payload.game_id;
        let route = state
            .router()
            .route_within(&RouteHint::game(game_id), settings.enter_route_timeout)
            .await
            .map_err(|e| {
                tracing::warn!(session_id = %connection.id(), game_id, error = %e, "No route for game");
                HandlerError::RouteUnavailable(e)
            })?;

        let service = state
            .game_pool()
            .get_connection(&route.endpoint)
            .map_err(|e| {
                tracing::warn!(endpoint = %route.endpoint, error = %e, "Game server unreachable");
                HandlerError::GameServerUnavailable(e)
            })?;

        let request = JoinRequest {
            header: RequestHeader::new(&user_id, connection.id()),
            gateway_address: settings.advertise_addr.clone(),
        };
        let response = call_with_timeout(settings.join_timeout, "join", service.on_player_join(request))
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %route.endpoint, error = %e, "Join call failed");
                HandlerError::JoinFailed(e)
            })?;

        if !response.is_success() {
            return Err(HandlerError::JoinRefused(
                response.error_message.unwrap_or_default(),
            ));
        }

        connection.session().enter_game(GameBinding::new(game_id, &route));

        tracing::info!(
            session_id = %connection.id(),
            user_id = %user_id,
            game_id,
            endpoint = %route.endpoint,
            kind = %route.kind,
            "Player entered game"
        );

        let reply = EnterGameReply {
            success: true,
            game_id,
        };
        send_envelope(connection, &ServerEnvelope::data(actions::ENTER_GAME, reply)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::super::MessageDispatcher;
    use crate::session::{Connection, GameRoute, Outbound, SessionPhase};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    async fn logged_in(harness: &Harness, id: &str) -> (Arc<Connection>, mpsc::Receiver<Outbound>) {
        let (conn, mut rx) = harness.connect(id);
        MessageDispatcher::dispatch(
            &harness.state,
            &conn,
            br#"{"action":"login","payload":{"token":"t1"}}"#,
        )
        .await;
        next_json(&mut rx);
        (conn, rx)
    }

    fn enter(game_id: i32) -> Vec<u8> {
        json!({"action": "enterGame", "payload": {"game_id": game_id}})
            .to_string()
            .into_bytes()
    }

    #[tokio::test]
    async fn test_enter_stateful_game_is_sticky() {
        let harness = Harness::new();
        let (conn, mut rx) = logged_in(&harness, "s1").await;

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(STATEFUL_GAME)).await;

        assert_eq!(
            next_json(&mut rx),
            json!({"action": "enterGame", "data": {"success": true, "game_id": STATEFUL_GAME}})
        );

        let session = conn.session();
        assert_eq!(session.phase(), SessionPhase::InGame);
        assert_eq!(session.game().unwrap().sticky_target(), Some("sticky:1"));
        assert!(!session.has_pending_deadline());
        drop(session);

        let joins = harness.game("sticky:1").joins.lock();
        assert_eq!(joins.len(), 1);
        assert_eq!(joins[0].header.user_id, "u1");
        assert_eq!(joins[0].header.session_id, "s1");
        assert_eq!(joins[0].gateway_address, "gateway:8081");
    }

    #[tokio::test]
    async fn test_enter_stateless_game_is_dynamic() {
        let harness = Harness::new();
        let (conn, mut rx) = logged_in(&harness, "s1").await;

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(STATELESS_GAME)).await;
        assert_eq!(next_json(&mut rx)["data"]["success"], true);
        assert_eq!(conn.session().game().unwrap().route, GameRoute::Dynamic);

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(STATEFUL_GAME)).await;
        assert_eq!(
            next_json(&mut rx),
            json!({"action": "enterGame", "error": "Already In Game"})
        );
    }

    #[tokio::test]
    async fn test_failures_leave_session_out_of_game() {
        let harness = Harness::new();
        let (conn, mut rx) = logged_in(&harness, "s1").await;

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(9999)).await;
        assert_eq!(
            next_json(&mut rx)["error"],
            "Game Service Unavailable or Invalid ID"
        );

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(DOWN_GAME)).await;
        assert_eq!(next_json(&mut rx)["error"], "Game Server Unavailable");

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(REFUSING_GAME)).await;
        assert_eq!(next_json(&mut rx)["error"], "Join Game Refused: room full");

        MessageDispatcher::dispatch(
            &harness.state,
            &conn,
            br#"{"action":"enterGame","payload":{"game_id":"x"}}"#,
        )
        .await;
        assert_eq!(next_json(&mut rx)["error"], "Invalid EnterGame Payload");

        assert_eq!(conn.session().phase(), SessionPhase::Authenticated);
        assert!(rx.try_recv().is_err());

        // Retry succeeds
        MessageDispatcher::dispatch(&harness.state, &conn, &enter(STATEFUL_GAME)).await;
        assert_eq!(next_json(&mut rx)["data"]["game_id"], STATEFUL_GAME);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enter_game_cancels_deadline() {
        let harness = Harness::new();
        let (conn, mut rx) = logged_in(&harness, "s1").await;

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(STATELESS_GAME)).await;
        next_json(&mut rx);

        tokio::time::sleep(Duration::from_secs(200)).await;
        assert!(rx.try_recv().is_err());
        assert!(!conn.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_enter_keeps_deadline() {
        let harness = Harness::new();
        let (conn, mut rx) = logged_in(&harness, "s1").await;

        MessageDispatcher::dispatch(&harness.state, &conn, &enter(9999)).await;
        assert_eq!(
            next_json(&mut rx)["error"],
            "Game Service Unavailable or Invalid ID"
        );
        MessageDispatcher::dispatch(&harness.state, &conn, &enter(REFUSING_GAME)).await;
        assert_eq!(next_json(&mut rx)["error"], "Join Game Refused: room full");
        assert!(conn.session().has_pending_deadline());

        tokio::time::sleep(Duration::from_secs(181)).await;
        assert_eq!(rx.recv().await, Some(Outbound::Close("Enter Game Timeout".into())));
    }
}
