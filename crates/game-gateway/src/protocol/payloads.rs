//! Payloads of gateway-handled actions

use game_core::GameId;
use serde::{Deserialize, Serialize};

/// `login` request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub token: String,
}

/// `login` reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub user_id: String,
    pub nickname: String,
    pub balance: i64,
}

/// `enterGame` request
#[derive(Debug, Clone, Deserialize)]
pub struct EnterGamePayload {
    #[serde(default)]
    pub game_id: GameId,
}

/// `enterGame` reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnterGameReply {
    pub success: bool,
    pub game_id: GameId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_defaults() {
        let login: LoginPayload = serde_json::from_value(json!({})).unwrap();
        assert!(login.token.is_empty());

        let enter: EnterGamePayload = serde_json::from_value(json!({"game_id": 1001})).unwrap();
        assert_eq!(enter.game_id, 1001);

        assert!(serde_json::from_value::<EnterGamePayload>(json!({"game_id": "x"})).is_err());
        assert!(serde_json::from_value::<LoginPayload>(json!("t1")).is_err());
    }
}
