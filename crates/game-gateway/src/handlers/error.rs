//! Handler error types

use crate::protocol::{actions, UNKNOWN_ACTION};
use crate::router::RouteError;
use game_core::DomainError;
use game_rpc::RpcError;
use thiserror::Error;

/// How the connection ends after an error reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disconnect {
    /// Keep the connection open
    None,
    /// Close right away
    Immediately(&'static str),
    /// Close after a short grace period so the error reply is delivered first
    AfterGrace(&'static str),
}

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Already logged in")]
    AlreadyLoggedIn,

    #[error("Invalid login payload: {0}")]
    InvalidLoginPayload(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Already in game")]
    AlreadyInGame,

    #[error("Invalid enterGame payload: {0}")]
    InvalidEnterGamePayload(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Route unavailable: {0}")]
    RouteUnavailable(#[source] RouteError),

    #[error("Game server unavailable: {0}")]
    GameServerUnavailable(#[source] RpcError),

    #[error("Join failed: {0}")]
    JoinFailed(#[source] DomainError),

    #[error("Join refused: {0}")]
    JoinRefused(String),

    #[error("No route for message")]
    NoRoute,

    #[error("Backend connection failed: {0}")]
    BackendConnectionFailed(#[source] RpcError),

    #[error("Game server error: {0}")]
    GameServerError(String),
}

impl HandlerError {
    /// Short reason shown to the client in the `error` field
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidJson(_) => "Invalid JSON format".to_string(),
            Self::AlreadyLoggedIn => "Already Logged In".to_string(),
            Self::InvalidLoginPayload(_) => "Invalid Login Payload".to_string(),
            Self::AuthenticationFailed(_) => "Authentication Failed".to_string(),
            Self::AlreadyInGame => "Already In Game".to_string(),
            Self::InvalidEnterGamePayload(_) => "Invalid EnterGame Payload".to_string(),
            Self::NotLoggedIn => "Not Logged In".to_string(),
            Self::RouteUnavailable(_) => "Game Service Unavailable or Invalid ID".to_string(),
            Self::GameServerUnavailable(_) => "Game Server Unavailable".to_string(),
            Self::JoinFailed(_) => "Join Game Failed".to_string(),
            Self::JoinRefused(reason) => format!("Join Game Refused: {reason}"),
            Self::NoRoute => "Unknown Action or Not In Game".to_string(),
            Self::BackendConnectionFailed(_) => "Backend Connection Failed".to_string(),
            Self::GameServerError(reason) => format!("Game Server Error: {reason}"),
        }
    }

    /// Action the error reply is reported under
    pub fn reply_action<'a>(&self, requested: &'a str) -> &'a str {
        match self {
            Self::InvalidJson(_) => UNKNOWN_ACTION,
            Self::BackendConnectionFailed(_) | Self::GameServerError(_) => actions::FORWARD,
            _ => requested,
        }
    }

    pub fn disconnect(&self) -> Disconnect {
        match self {
            Self::InvalidLoginPayload(_) => Disconnect::Immediately("Invalid Protocol"),
            Self::NotLoggedIn => Disconnect::Immediately("Not Logged In"),
            Self::AuthenticationFailed(_) => Disconnect::AfterGrace("Auth Failed"),
            _ => Disconnect::None,
        }
    }

    pub fn closes_connection(&self) -> bool {
        self.disconnect() != Disconnect::None
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
