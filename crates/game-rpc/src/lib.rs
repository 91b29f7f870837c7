//! # game-rpc
//!
//! Inter-service plumbing shared by the gateway and game backends.
//!
//! ## Features
//!
//! - **HTTP clients**: `game-core` service ports implemented over HTTP + JSON
//!   (`CentralClient`, `HttpGameClient`, `HttpConnectorClient`)
//! - **Connection pool**: one lazily created client per remote address
//! - **Registrar**: keeps a backend instance registered with the central
//!   registry (register, heartbeat, re-register, deregister on stop)

pub mod client;
pub mod error;
pub mod pool;
pub mod registrar;

pub use client::{
    connector_pool, game_pool, CentralClient, ConnectorPool, GamePool, HttpChannel,
    HttpConnectorClient, HttpGameClient,
};
pub use error::{call_with_timeout, RpcError, RpcResult};
pub use pool::ConnectionPool;
pub use registrar::{Registrar, RegistrarConfig, RegistrarState};
