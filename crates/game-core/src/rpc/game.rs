//! Gateway-to-game messages (join, quit, message)

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::ResultCode;

/// Per-call header identifying the player and the gateway session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub req_id: String,
    pub user_id: String,
    pub session_id: String,
    pub timestamp_ms: i64,
}

impl RequestHeader {
    /// Build a header stamped with the current time
    pub fn new(user_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            req_id: now.timestamp_nanos_opt().unwrap_or_default().to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            timestamp_ms: now.timestamp_millis(),
        }
    }
}

/// Player joined; `gateway_address` is where pushes and kicks go back to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub header: RequestHeader,
    pub gateway_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuitRequest {
    pub header: RequestHeader,
}

/// Opaque client message forwarded to a game instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub header: RequestHeader,
    #[serde(with = "super::payload")]
    pub payload: Vec<u8>,
}

/// Reply to any gateway-to-game call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResponse {
    pub code: ResultCode,
    #[serde(with = "super::payload", default)]
    pub payload: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl GameResponse {
    /// Successful reply without payload
    pub fn ok() -> Self {
        Self {
            code: ResultCode::Success,
            payload: Vec::new(),
            error_message: None,
        }
    }

    /// Successful reply carrying a payload
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            payload,
            ..Self::ok()
        }
    }

    /// Failed reply with a code and reason
    pub fn error(code: ResultCode, message: impl Into<String>) -> Self {
        Self {
            code,
            payload: Vec::new(),
            error_message: Some(message.into()),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_stamped() {
        let header = RequestHeader::new("u1", "s1");
        assert_eq!(header.user_id, "u1");
        assert_eq!(header.session_id, "s1");
        assert!(header.timestamp_ms > 0);
        assert!(!header.req_id.is_empty());
    }

    #[test]
    fn test_message_request_payload_is_base64() {
        let req = MessageRequest {
            header: RequestHeader::new("u1", "s1"),
            payload: br#"{"action":"spin"}"#.to_vec(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json["payload"].is_string());

        let back: MessageRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back.payload, req.payload);
    }

    #[test]
    fn test_game_response_defaults_missing_payload() {
        let resp: GameResponse = serde_json::from_str(r#"{"code":"SUCCESS"}"#).unwrap();
        assert!(resp.is_success());
        assert!(resp.payload.is_empty());
        assert!(resp.error_message.is_none());
    }
}
