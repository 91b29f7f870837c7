//! Client protocol
//!
//! JSON envelopes exchanged over the client WebSocket and the payloads of
//! the actions the gateway handles itself.

mod envelope;
mod payloads;

pub use envelope::{ClientEnvelope, ServerEnvelope, UNKNOWN_ACTION};
pub use payloads::{EnterGamePayload, EnterGameReply, LoginPayload, LoginReply};

/// Actions handled by the gateway; anything else is forwarded to the game
pub mod actions {
    pub const LOGIN: &str = "login";
    pub const ENTER_GAME: &str = "enterGame";
    /// Reported on errors raised while forwarding
    pub const FORWARD: &str = "forward";
}
