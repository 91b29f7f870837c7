//! RPC error types

use game_core::{DomainError, RepoResult};
use std::future::Future;
use std::time::Duration;

/// Errors raised by outbound RPC calls
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Invalid address {address}: {reason}")]
    Dial { address: String, reason: String },

    #[error("Connection failed: {0}")]
    Unavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Remote returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl RpcError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub(crate) fn dial(address: &str, reason: impl std::fmt::Display) -> Self {
        Self::Dial {
            address: address.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Unavailable(err.to_string())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<RpcError> for DomainError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Dial { .. } | RpcError::Unavailable(_) | RpcError::Transport(_) => {
                DomainError::Unavailable(err.to_string())
            }
            RpcError::Timeout(msg) => DomainError::Timeout(msg),
            RpcError::Status { .. } | RpcError::Decode(_) => DomainError::Rejected(err.to_string()),
            RpcError::NotFound(what) => DomainError::InternalError(format!("not found: {what}")),
        }
    }
}

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Run a port call under a deadline, reporting expiry as `DomainError::Timeout(op)`
pub async fn call_with_timeout<T, F>(limit: Duration, op: &str, call: F) -> RepoResult<T>
where
    F: Future<Output = RepoResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::Timeout(op.to_string())),
    }
}
