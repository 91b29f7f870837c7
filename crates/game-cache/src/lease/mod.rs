//! Lease store adapters
//!
//! Two implementations of `game_core::LeaseStore`: Redis for deployments
//! and an in-memory map for single-process setups and tests.

mod memory_store;
mod redis_store;

pub use memory_store::MemoryLeaseStore;
pub use redis_store::RedisLeaseStore;
