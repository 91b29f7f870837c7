//! RPC message set
//!
//! Request and response bodies exchanged between the central registry,
//! the gateway, and game service instances. Opaque byte payloads travel
//! as base64 strings.

mod codes;
mod connector;
mod game;
pub mod payload;
mod registry;

pub use codes::ResultCode;
pub use connector::{ConnectorResponse, KickRequest, SendMessageRequest};
pub use game::{GameResponse, JoinRequest, MessageRequest, QuitRequest, RequestHeader};
pub use registry::{
    DeregisterRequest, DeregisterResponse, HeartbeatRequest, HeartbeatResponse, LoginRequest,
    LoginResponse, RegisterRequest, RegisterResponse, RouteRequest,
};
