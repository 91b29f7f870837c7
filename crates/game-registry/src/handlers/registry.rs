//! Lease and route handlers

use axum::{extract::State, Json};
use game_core::{
    DeregisterRequest, DeregisterResponse, HeartbeatRequest, HeartbeatResponse, RegisterRequest,
    RegisterResponse, RegistryApi, RouteRequest, ServiceRoute,
};

use crate::error::{RegistryError, RegistryResult};
use crate::server::RegistryState;

/// POST /registry/register
pub async fn register(
    State(state): State<RegistryState>,
    Json(request): Json<RegisterRequest>,
) -> RegistryResult<Json<RegisterResponse>> {
    if request.endpoint.trim().is_empty() {
        return Err(RegistryError::InvalidRequest("endpoint is required".into()));
    }
    let response = RegistryApi::register(state.registry().as_ref(), request).await?;
    Ok(Json(response))
}

/// POST /registry/heartbeat
///
/// A lost lease is `success: false`, not an HTTP error.
pub async fn heartbeat(
    State(state): State<RegistryState>,
    Json(request): Json<HeartbeatRequest>,
) -> RegistryResult<Json<HeartbeatResponse>> {
    let success =
        RegistryApi::heartbeat(state.registry().as_ref(), &request.lease_id, request.load).await?;
    Ok(Json(HeartbeatResponse { success }))
}

/// POST /registry/deregister
pub async fn deregister(
    State(state): State<RegistryState>,
    Json(request): Json<DeregisterRequest>,
) -> Json<DeregisterResponse> {
    let success = match state.registry().deregister(&request.lease_id).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(lease_id = %request.lease_id, error = %e, "Deregister failed");
            false
        }
    };
    Json(DeregisterResponse { success })
}

/// POST /registry/route
///
/// 404 when no instance is indexed for the game.
pub async fn route(
    State(state): State<RegistryState>,
    Json(request): Json<RouteRequest>,
) -> RegistryResult<Json<ServiceRoute>> {
    match state.registry().select_service_by_game(request.game_id).await {
        Ok(Some(route)) => Ok(Json(route)),
        Ok(None) => Err(RegistryError::NoRoute(request.game_id)),
        Err(e) => {
            tracing::error!(game_id = request.game_id, error = %e, "Failed to lookup service for game");
            Err(e.into())
        }
    }
}
