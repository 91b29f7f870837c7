//! HTTP clients for the service ports

mod central;
mod channel;
mod connector;
mod game;

pub use central::CentralClient;
pub use channel::HttpChannel;
pub use connector::HttpConnectorClient;
pub use game::HttpGameClient;

use crate::pool::ConnectionPool;
use game_core::{ConnectorService, GameService};
use std::sync::Arc;

/// Pool of game instance clients keyed by instance endpoint
pub type GamePool = ConnectionPool<dyn GameService>;

/// Pool of gateway connector clients keyed by gateway RPC address
pub type ConnectorPool = ConnectionPool<dyn ConnectorService>;

/// Game client pool over HTTP
pub fn game_pool() -> GamePool {
    ConnectionPool::new(|address: &str| {
        let client: Arc<dyn GameService> = Arc::new(HttpGameClient::connect(address)?);
        Ok(client)
    })
}

/// Connector client pool over HTTP
pub fn connector_pool() -> ConnectorPool {
    ConnectionPool::new(|address: &str| {
        let client: Arc<dyn ConnectorService> = Arc::new(HttpConnectorClient::connect(address)?);
        Ok(client)
    })
}
