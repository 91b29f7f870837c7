//! Backend routing
//!
//! [`SmartRouter`] turns a routing hint into a concrete game instance through a
//! pluggable [`Discovery`] source: the central registry in production, a fixed
//! table for local setups.

mod discovery;
mod smart;

pub use discovery::{Discovery, RegistryDiscovery, StaticDiscovery};
pub use smart::{RouteHint, SmartRouter, STATEFUL_TARGET, STATELESS_TARGET};

use game_core::{DomainError, GameId};
use thiserror::Error;

/// Routing failures
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("No route for {0}")]
    NotFound(String),

    #[error("Game id required for registry lookup")]
    MissingGameId,

    #[error("No instance serves game {0}")]
    NoInstance(GameId),

    #[error("Route lookup failed: {0}")]
    Lookup(#[from] DomainError),

    #[error("Route lookup timed out")]
    Timeout,
}
