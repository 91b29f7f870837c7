//! # game-gateway
//!
//! Client-facing gateway. Terminates player WebSocket connections, runs the
//! per-connection session state machine (login, enter game, forward), and
//! routes game traffic to backend instances found through the registry.
//!
//! A second listener serves the connector surface that game instances use
//! to push messages to sessions and to kick them.

pub mod handlers;
pub mod protocol;
pub mod router;
pub mod server;
pub mod session;

pub use server::{
    create_app, create_connector_app, create_gateway_state, run, GatewayConnector,
    GatewaySettings, GatewayState,
};
pub use session::{Connection, Outbound, SessionTable};
