//! Login handler

use axum::{extract::State, Json};
use game_core::{Authenticator, LoginRequest, LoginResponse};

use crate::error::RegistryResult;
use crate::server::RegistryState;

/// POST /auth/login
///
/// Rejected tokens are a normal reply with `success: false`.
pub async fn login(
    State(state): State<RegistryState>,
    Json(request): Json<LoginRequest>,
) -> RegistryResult<Json<LoginResponse>> {
    Ok(Json(state.login().login(&request.token).await?))
}
