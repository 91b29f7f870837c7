//! Framework error types

use game_core::{DomainError, ResultCode};
use game_rpc::RpcError;
use thiserror::Error;

/// Errors raised by the framework or a game handler
#[derive(Debug, Error)]
pub enum FrameworkError {
    #[error("Peer not found")]
    PeerNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("{0}")]
    Collaborator(#[from] DomainError),

    #[error("Gateway call failed: {0}")]
    Rpc(#[from] RpcError),

    /// Game logic refused or failed the call
    #[error("{0}")]
    Handler(String),
}

impl FrameworkError {
    /// Build a handler failure
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }

    /// Result code reported back to the gateway
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::UserNotFound(_) => ResultCode::NotFound,
            Self::Collaborator(e) if e.is_validation() => ResultCode::InvalidRequest,
            _ => ResultCode::ServerError,
        }
    }
}

/// Framework result type
pub type FrameworkResult<T> = Result<T, FrameworkError>;
