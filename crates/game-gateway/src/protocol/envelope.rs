//! Envelope format
//!
//! Requests are `{action, payload}`; responses are `{action, data?, error?}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Action reported when the client frame could not be parsed
pub const UNKNOWN_ACTION: &str = "unknown";

/// Client request
#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnvelope {
    #[serde(default)]
    pub action: String,

    /// Action payload; left opaque until a handler decodes it
    #[serde(default)]
    pub payload: Value,
}

impl ClientEnvelope {
    /// Parse a client frame. Only JSON objects are envelopes.
    pub fn parse(raw: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(raw)
    }

    /// Decode the payload into an action-specific type
    pub fn payload_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

/// Server response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerEnvelope {
    pub action: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerEnvelope {
    /// Successful reply carrying `data`
    pub fn data(action: impl Into<String>, data: impl Serialize) -> Self {
        Self {
            action: action.into(),
            data: Some(serde_json::to_value(data).unwrap_or_default()),
            error: None,
        }
    }

    /// Error reply with a short human-readable reason
    pub fn error(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Serialize to JSON text
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
