//! Registry surface messages (register, heartbeat, deregister, route, login)

use serde::{Deserialize, Serialize};

use crate::entities::{GameId, ServiceKind};

/// Register a backend instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub service_name: String,
    pub kind: ServiceKind,
    pub endpoint: String,
    #[serde(default)]
    pub game_ids: Vec<GameId>,
}

/// Lease granted to a registered instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub lease_id: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatRequest {
    pub lease_id: String,
    #[serde(default)]
    pub load: i64,
}

/// `success == false` means the lease is gone and the caller must re-register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeregisterRequest {
    pub lease_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeregisterResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub game_id: GameId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub token: String,
}

/// Login outcome with the user snapshot and wallet balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub balance: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl LoginResponse {
    /// Successful login
    pub fn accepted(user_id: impl Into<String>, nickname: impl Into<String>, balance: i64) -> Self {
        Self {
            success: true,
            user_id: user_id.into(),
            nickname: nickname.into(),
            balance,
            error_message: None,
        }
    }

    /// Rejected login carrying a reason
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            user_id: String::new(),
            nickname: String::new(),
            balance: 0,
            error_message: Some(reason.into()),
        }
    }
}
