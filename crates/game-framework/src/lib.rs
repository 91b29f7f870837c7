//! # game-framework
//!
//! Building blocks for a game backend instance. A game implements
//! [`GameHandler`]; [`GameServer`] runs the join/quit/message lifecycle
//! around it, keeps [`Peer`]s for stateful games, and lets the game push to
//! or kick players through the gateway that owns their connection.
//!
//! [`run_game_server`] wires a handler into a registered, heartbeating
//! backend process.

pub mod bootstrap;
pub mod demo;
pub mod error;
pub mod handler;
pub mod peer;
pub mod server;

pub use bootstrap::run_game_server;
pub use error::{FrameworkError, FrameworkResult};
pub use handler::GameHandler;
pub use peer::{Peer, PeerManager, DEFAULT_PEER_TIMEOUT};
pub use server::{create_app, create_router, GameServer};
