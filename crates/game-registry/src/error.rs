//! HTTP error mapping for the registry surface

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use game_core::{DomainError, GameId};
use serde::Serialize;
use thiserror::Error;

/// Registry request errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("service not found for game {0}")]
    NoRoute(GameId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RegistryError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Domain(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            Self::Domain(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            Self::Domain(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRoute(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Domain(e) => e.code(),
            Self::NoRoute(_) => "NO_SERVICE_AVAILABLE",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub error: String,
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Registry request failed");
        }

        let body = ErrorBody {
            code: self.error_code(),
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for registry handlers
pub type RegistryResult<T> = Result<T, RegistryError>;
