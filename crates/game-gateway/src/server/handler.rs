//! WebSocket handler
//!
//! One reader task dispatches client frames, one writer task drains the
//! connection's outbound queue. Whichever ends first tears the other down.

use crate::handlers::{DisconnectHandler, MessageDispatcher};
use crate::server::GatewayState;
use crate::session::{Connection, Outbound};
use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let session_id = Connection::generate_id();
    let (tx, mut rx) = mpsc::channel::<Outbound>(MESSAGE_BUFFER_SIZE);

    let connection = Connection::new(session_id.clone(), tx);
    let login_deadline = connection.deadline(state.settings().login_timeout, "Login Timeout");
    connection.session().set_login_deadline(login_deadline);
    state.sessions().add(connection.clone());

    tracing::info!(
        session_id = %session_id,
        sessions = state.sessions().count(),
        "WebSocket connection established"
    );

    let (mut ws_sink, mut ws_stream) = socket.split();

    let state_recv = state.clone();
    let session_id_recv = session_id.clone();
    let connection_recv = connection.clone();

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    MessageDispatcher::dispatch(&state_recv, &connection_recv, text.as_bytes())
                        .await;
                }
                Ok(Message::Binary(data)) => {
                    MessageDispatcher::dispatch(&state_recv, &connection_recv, &data).await;
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong is handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(session_id = %session_id_recv, "Client closed connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id_recv,
                        error = %e,
                        "WebSocket error"
                    );
                    break;
                }
            }
        }
    });

    let session_id_send = session_id.clone();

    let mut send_task = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Text(text) => {
                    if ws_sink.send(Message::Text(text)).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send message to WebSocket"
                        );
                        break;
                    }
                }
                Outbound::Binary(data) => {
                    if ws_sink.send(Message::Binary(data)).await.is_err() {
                        tracing::warn!(
                            session_id = %session_id_send,
                            "Failed to send message to WebSocket"
                        );
                        break;
                    }
                }
                Outbound::Close(reason) => {
                    tracing::info!(session_id = %session_id_send, reason = %reason, "Kicking client");
                    let frame = CloseFrame {
                        code: close_code::NORMAL,
                        reason: reason.into(),
                    };
                    let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    break;
                }
            }
        }

        let _ = ws_sink.close().await;
    });

    tokio::select! {
        _ = &mut recv_task => {
            tracing::debug!(session_id = %session_id, "Receive task ended");
            send_task.abort();
        }
        _ = &mut send_task => {
            tracing::debug!(session_id = %session_id, "Send task ended");
            recv_task.abort();
        }
    }

    DisconnectHandler::handle(&state, &connection).await;
}
