//! Application error types
//!
//! Errors surfaced while bootstrapping and running a process. Request-level
//! failures have their own per-crate types; this is what `main` sees.

use crate::config::ConfigError;
use game_core::DomainError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Listener errors
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),

    // Redis errors
    #[error("Cache error: {0}")]
    Cache(String),

    // Outbound RPC errors
    #[error("External service error: {0}")]
    ExternalService(String),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Create a bind error for an address
    pub fn bind(addr: impl std::fmt::Display, source: std::io::Error) -> Self {
        Self::Bind {
            addr: addr.to_string(),
            source,
        }
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    /// Get error code for logs and exit reporting
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Bind { .. } => "BIND_ERROR",
            Self::Server(_) => "SERVER_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Domain(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::from(ConfigError::MissingVar("REDIS_URL"));
        assert_eq!(err.error_code(), "CONFIG_ERROR");
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: REDIS_URL"
        );

        let err = AppError::from(DomainError::InvalidToken);
        assert_eq!(err.error_code(), "INVALID_TOKEN");
    }

    #[test]
    fn test_bind_error_message() {
        let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use");
        let err = AppError::bind("127.0.0.1:8080", io);
        assert_eq!(err.to_string(), "Failed to bind to 127.0.0.1:8080: in use");
    }

    #[test]
    fn test_internal_helper() {
        let err = AppError::internal(anyhow::anyhow!("boom"));
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }
}
