//! Players as seen by a game instance

mod manager;
mod peer;

pub use manager::PeerManager;
pub use peer::{Peer, DEFAULT_PEER_TIMEOUT};
