//! `login` handler

use super::{send_envelope, HandlerError, HandlerResult};
use crate::protocol::{actions, ClientEnvelope, LoginPayload, LoginReply, ServerEnvelope};
use crate::server::GatewayState;
use crate::session::Connection;
use game_rpc::call_with_timeout;
use std::sync::Arc;

/// Authenticates a connection against the central login service
pub struct LoginHandler;

impl LoginHandler {
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        envelope: &ClientEnvelope,
    ) -> HandlerResult<()> {
        if connection.session().is_authenticated() {
            return Err(HandlerError::AlreadyLoggedIn);
        }

        let payload: LoginPayload = envelope
            .payload_as()
            .map_err(|e| HandlerError::InvalidLoginPayload(e.to_string()))?;

        let settings = state.settings();
        let response = call_with_timeout(
            settings.auth_timeout,
            "login",
            state.authenticator().login(&payload.token),
        )
        .await
        .map_err(|e| {
            tracing::warn!(session_id = %connection.id(), error = %e, "Login call failed");
            HandlerError::AuthenticationFailed(e.to_string())
        })?;

        if !response.success {
            return Err(HandlerError::AuthenticationFailed(
                response.error_message.unwrap_or_default(),
            ));
        }

        let enter_game_deadline = connection.deadline(settings.enter_game_timeout, "Enter Game Timeout");
        connection
            .session()
            .authenticate(response.user_id.clone(), enter_game_deadline);

        tracing::info!(
            session_id = %connection.id(),
            user_id = %response.user_id,
            "User logged in"
        );

        let reply = LoginReply {
            success: true,
            error_message: None,
            user_id: response.user_id,
            nickname: response.nickname,
            balance: response.balance,
        };
        send_envelope(connection, &ServerEnvelope::data(actions::LOGIN, reply)).await;
        Ok(())
    }
}
