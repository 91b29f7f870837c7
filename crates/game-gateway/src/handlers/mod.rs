//! Client message handlers
//!
//! `login` and `enterGame` are handled by the gateway; every other action is
//! forwarded to the game the session entered.

mod disconnect;
mod enter_game;
mod error;
mod forward;
mod login;

pub use disconnect::DisconnectHandler;
pub use enter_game::EnterGameHandler;
pub use error::{Disconnect, HandlerError, HandlerResult};
pub use forward::ForwardHandler;
pub use login::LoginHandler;

use crate::protocol::{actions, ClientEnvelope, ServerEnvelope};
use crate::server::GatewayState;
use crate::session::Connection;
use std::sync::Arc;

/// Dispatch incoming client frames to the appropriate handler
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Handle one client frame. Failures become error envelopes, and the
    /// protocol violations among them also close the connection.
    pub async fn dispatch(state: &GatewayState, connection: &Arc<Connection>, raw: &[u8]) {
        let envelope = match ClientEnvelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                let err = HandlerError::InvalidJson(e.to_string());
                Self::reply_error(state, connection, "", &err).await;
                return;
            }
        };

        tracing::trace!(
            session_id = %connection.id(),
            action = %envelope.action,
            "Received message"
        );

        let result = match envelope.action.as_str() {
            actions::LOGIN => LoginHandler::handle(state, connection, &envelope).await,
            actions::ENTER_GAME => EnterGameHandler::handle(state, connection, &envelope).await,
            _ => ForwardHandler::handle(state, connection, raw).await,
        };

        if let Err(e) = result {
            Self::reply_error(state, connection, &envelope.action, &e).await;
        }
    }

    async fn reply_error(
        state: &GatewayState,
        connection: &Arc<Connection>,
        action: &str,
        err: &HandlerError,
    ) {
        tracing::debug!(
            session_id = %connection.id(),
            action,
            error = %err,
            "Handler error"
        );

        let reply = ServerEnvelope::error(err.reply_action(action), err.client_message());
        send_envelope(connection, &reply).await;

        match err.disconnect() {
            Disconnect::None => {}
            Disconnect::Immediately(reason) => connection.close(reason).await,
            Disconnect::AfterGrace(reason) => {
                connection.close_after(state.settings().kick_grace, reason);
            }
        }
    }
}

/// Serialize and queue a reply
pub(crate) async fn send_envelope(connection: &Connection, envelope: &ServerEnvelope) {
    match envelope.to_json() {
        Ok(json) => {
            if !connection.send_text(json).await {
                tracing::debug!(session_id = %connection.id(), "Reply dropped, writer closed");
            }
        }
        Err(e) => {
            tracing::error!(session_id = %connection.id(), error = %e, "Failed to encode reply");
        }
    }
}
