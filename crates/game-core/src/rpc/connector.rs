//! Game-to-gateway messages (push and kick)

use serde::{Deserialize, Serialize};

use super::ResultCode;

/// Push a payload to one or more gateway sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub session_ids: Vec<String>,
    #[serde(with = "super::payload")]
    pub payload: Vec<u8>,
}

/// Forcibly close a gateway session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KickRequest {
    pub session_id: String,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorResponse {
    pub code: ResultCode,
}

impl ConnectorResponse {
    pub fn ok() -> Self {
        Self {
            code: ResultCode::Success,
        }
    }
}
