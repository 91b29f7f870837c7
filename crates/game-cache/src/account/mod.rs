//! Account stores - user directory and wallet adapters

mod memory_users;
mod memory_wallet;
mod redis_users;
mod redis_wallet;

pub use memory_users::MemoryUserStore;
pub use memory_wallet::MemoryWallet;
pub use redis_users::{RedisUserStore, GUEST_TTL};
pub use redis_wallet::RedisWallet;

/// Balance a wallet opens with
pub const DEFAULT_BALANCE: i64 = 1_000_000;
