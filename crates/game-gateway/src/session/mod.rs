//! Session management
//!
//! One [`Connection`] per client socket, holding its typed [`Session`] state,
//! and the [`SessionTable`] of all live connections.

mod connection;
mod deadline;
mod state;
mod table;

pub use connection::{Connection, Outbound};
pub use deadline::Deadline;
pub use state::{GameBinding, GameRoute, Session, SessionPhase};
pub use table::SessionTable;
