//! Redis connection pool

mod redis_pool;

pub(crate) use redis_pool::ttl_millis;
pub use redis_pool::{CacheError, CacheResult, RedisPool, RedisPoolConfig};
