//! # game-cache
//!
//! Storage adapters behind the `game-core` ports.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Lease Store**: TTL keys and sets for the service registry, in Redis or in memory
//! - **User Directory**: token and user records (`token:<token>`, `user:<id>`)
//! - **Wallet**: per-user balances (`wallet:<user_id>`)
//!
//! The in-memory adapters keep the same semantics as their Redis twins and
//! run on the tokio clock, so tests can drive expiry with paused time.
//!
//! ## Example
//!
//! ```ignore
//! use game_cache::{RedisLeaseStore, RedisPool, RedisPoolConfig};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let store = RedisLeaseStore::new(pool.clone());
//! store.put("services:lease:abc", "{}", Some(Duration::from_secs(10))).await?;
//! ```

pub mod account;
pub mod lease;
pub mod pool;

// Re-export pool types
pub use pool::{CacheError, CacheResult, RedisPool, RedisPoolConfig};

// Re-export store types
pub use account::{
    MemoryUserStore, MemoryWallet, RedisUserStore, RedisWallet, DEFAULT_BALANCE, GUEST_TTL,
};
pub use lease::{MemoryLeaseStore, RedisLeaseStore};
