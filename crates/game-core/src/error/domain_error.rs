//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::GameId;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("lease not found: {0}")]
    LeaseNotFound(String),

    #[error("no service available for game {0}")]
    NoServiceAvailable(GameId),

    #[error("Peer not found: {0}")]
    PeerNotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: i64, available: i64 },

    // =========================================================================
    // Remote Errors
    // =========================================================================
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Rejected by remote: {0}")]
    Rejected(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for RPC responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::LeaseNotFound(_) => "LEASE_NOT_FOUND",
            Self::NoServiceAvailable(_) => "NO_SERVICE_AVAILABLE",
            Self::PeerNotFound(_) => "UNKNOWN_PEER",
            Self::SessionNotFound(_) => "UNKNOWN_SESSION",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Validation
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",

            // Remote
            Self::Unavailable(_) => "UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Rejected(_) => "REJECTED",

            // Infrastructure
            Self::StoreError(_) => "STORE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::LeaseNotFound(_)
                | Self::NoServiceAvailable(_)
                | Self::PeerNotFound(_)
                | Self::SessionNotFound(_)
                | Self::UserNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken | Self::InvalidRequest(_) | Self::InsufficientBalance { .. }
        )
    }

    /// Check if the remote side could not be reached or did not answer in time
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_))
    }
}
