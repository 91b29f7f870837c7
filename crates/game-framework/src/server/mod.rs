//! Backend HTTP surface
//!
//! Serves the gateway-to-game calls over a [`GameServer`].

mod game_server;

pub use game_server::GameServer;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use game_core::{
    GameResponse, GameService, JoinRequest, MessageRequest, QuitRequest, RepoResult, ResultCode,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the game router
pub fn create_router() -> Router<Arc<GameServer>> {
    Router::new()
        .route("/game/join", post(join))
        .route("/game/quit", post(quit))
        .route("/game/message", post(message))
        .route("/health", get(health_check))
}

/// Build the complete application
pub fn create_app(server: Arc<GameServer>) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

async fn health_check() -> &'static str {
    "OK"
}

/// POST /game/join
async fn join(
    State(server): State<Arc<GameServer>>,
    Json(request): Json<JoinRequest>,
) -> Json<GameResponse> {
    Json(reply(server.on_player_join(request).await))
}

/// POST /game/quit
async fn quit(
    State(server): State<Arc<GameServer>>,
    Json(request): Json<QuitRequest>,
) -> Json<GameResponse> {
    Json(reply(server.on_player_quit(request).await))
}

/// POST /game/message
async fn message(
    State(server): State<Arc<GameServer>>,
    Json(request): Json<MessageRequest>,
) -> Json<GameResponse> {
    Json(reply(server.on_message(request).await))
}

fn reply(result: RepoResult<GameResponse>) -> GameResponse {
    result.unwrap_or_else(|e| GameResponse::error(ResultCode::ServerError, e.to_string()))
}
