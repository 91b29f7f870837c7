//! # game-core
//!
//! Domain layer for the game backend: service leases and routes, users,
//! the RPC message set shared by the registry, gateway and game services,
//! and the port traits those components talk through.
//! This crate has zero dependencies on infrastructure (Redis, HTTP, etc.).

pub mod entities;
pub mod error;
pub mod rpc;
pub mod traits;

// Re-export commonly used types at crate root
pub use entities::{GameId, LeaseRecord, ServiceKind, ServiceRoute, User};
pub use error::DomainError;
pub use rpc::{
    ConnectorResponse, DeregisterRequest, DeregisterResponse, GameResponse, HeartbeatRequest,
    HeartbeatResponse, JoinRequest, KickRequest, LoginRequest, LoginResponse, MessageRequest,
    QuitRequest, RegisterRequest, RegisterResponse, RequestHeader, ResultCode, RouteRequest,
    SendMessageRequest,
};
pub use traits::{
    Authenticator, ConnectorService, GameService, LeaseStore, RegistryApi, RepoResult,
    RouteLookup, UserDirectory, Wallet,
};
