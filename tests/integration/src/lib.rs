//! Integration test support
//!
//! Spins up a registry, game backends and a gateway on loopback ports with
//! in-memory stores, and drives them the way a real client would.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
