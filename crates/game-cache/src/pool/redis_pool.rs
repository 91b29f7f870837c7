//! Redis connection pool
//!
//! Wraps deadpool-redis and carries the few primitives the stores share:
//! raw and JSON values with millisecond TTLs, and cursor-based key scans.

use deadpool_redis::{Config, Pool, Runtime};
use game_core::DomainError;
use redis::AsyncCommands;
use std::time::Duration;

/// Keys fetched per `SCAN` round trip
const SCAN_BATCH: usize = 100;

/// Redis pool configuration
#[derive(Debug, Clone)]
pub struct RedisPoolConfig {
    /// Redis connection URL (e.g., `redis://localhost:6379`)
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: usize,
}

impl Default for RedisPoolConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            max_connections: 16,
        }
    }
}

impl From<&game_common::RedisConfig> for RedisPoolConfig {
    fn from(config: &game_common::RedisConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_connections: config.max_connections as usize,
        }
    }
}

/// Error type for Redis-backed stores
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to create Redis pool: {0}")]
    CreatePool(String),

    #[error("Failed to get connection from pool: {0}")]
    GetConnection(#[from] deadpool_redis::PoolError),

    #[error("Redis command error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Wrong value type at key {0}")]
    WrongType(String),
}

impl From<CacheError> for DomainError {
    fn from(err: CacheError) -> Self {
        DomainError::StoreError(err.to_string())
    }
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Managed Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    pool: Pool,
}

impl std::fmt::Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("status", &self.pool.status())
            .finish()
    }
}

impl RedisPool {
    /// Create a new Redis pool with the given configuration
    pub fn new(config: RedisPoolConfig) -> CacheResult<Self> {
        let cfg = Config::from_url(&config.url);
        let pool = cfg
            .builder()
            .map_err(|e| CacheError::CreatePool(e.to_string()))?
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| CacheError::CreatePool(e.to_string()))?;

        // Redact credentials from URL for logging
        let safe_url = config.url.split('@').next_back().unwrap_or(&config.url);
        tracing::info!(
            url = %safe_url,
            max_connections = config.max_connections,
            "Redis pool created"
        );

        Ok(Self { pool })
    }

    /// Create a new Redis pool from game-common config
    pub fn from_config(config: &game_common::RedisConfig) -> CacheResult<Self> {
        Self::new(RedisPoolConfig::from(config))
    }

    /// Get a connection from the pool
    pub async fn get(&self) -> CacheResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(CacheError::GetConnection)
    }

    /// Round-trip a `PING` through the pool
    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.get().await?;
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    /// Store a JSON-serialized value with optional TTL
    pub async fn set_json<V: serde::Serialize>(
        &self,
        key: &str,
        value: &V,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let serialized = serde_json::to_string(value)?;
        self.set_raw(key, &serialized, ttl).await
    }

    /// Get a JSON-serialized value by key
    pub async fn get_json<V: serde::de::DeserializeOwned>(&self, key: &str) -> CacheResult<Option<V>> {
        match self.get_raw(key).await? {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    /// Store a plain string with optional TTL (millisecond precision)
    pub async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> CacheResult<()> {
        let mut conn = self.get().await?;
        match ttl {
            Some(ttl) => {
                conn.pset_ex::<_, _, ()>(key, value, ttl_millis(ttl)).await?;
            }
            None => {
                conn.set::<_, _, ()>(key, value).await?;
            }
        }
        Ok(())
    }

    /// Get a plain string
    pub async fn get_raw(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.get().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    /// Scan keys matching a pattern using cursor-based iteration.
    pub async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.get().await?;
        let mut cursor: u64 = 0;
        let mut all_keys = Vec::new();

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            all_keys.extend(keys);
            cursor = next_cursor;

            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once
        all_keys.sort_unstable();
        all_keys.dedup();
        Ok(all_keys)
    }
}

/// TTL in milliseconds, at least 1 so a zero duration still expires
pub(crate) fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RedisPoolConfig::default();
        assert_eq!(config.url, "redis://127.0.0.1:6379");
        assert_eq!(config.max_connections, 16);
    }

    #[test]
    fn test_config_from_redis_config() {
        let redis_config = game_common::RedisConfig {
            url: "redis://localhost:6380".to_string(),
            max_connections: 32,
        };
        let pool_config = RedisPoolConfig::from(&redis_config);
        assert_eq!(pool_config.url, "redis://localhost:6380");
        assert_eq!(pool_config.max_connections, 32);
    }

    #[test]
    fn test_ttl_millis() {
        assert_eq!(ttl_millis(Duration::from_secs(10)), 10_000);
        assert_eq!(ttl_millis(Duration::ZERO), 1);
    }

    #[test]
    fn test_cache_error_maps_to_store_error() {
        let err: DomainError = CacheError::WrongType("k".into()).into();
        assert_eq!(err.code(), "STORE_ERROR");
    }
}
