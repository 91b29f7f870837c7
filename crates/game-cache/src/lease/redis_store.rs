//! Redis-backed lease store.

use crate::pool::{ttl_millis, CacheResult, RedisPool};
use async_trait::async_trait;
use game_core::{LeaseStore, RepoResult};
use redis::AsyncCommands;
use std::time::Duration;

/// `LeaseStore` over a shared Redis instance
#[derive(Clone, Debug)]
pub struct RedisLeaseStore {
    pool: RedisPool,
}

impl RedisLeaseStore {
    /// Create a new Redis lease store
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn expire_ms(&self, key: &str, ttl: Duration) -> CacheResult<bool> {
        let ms = i64::try_from(ttl_millis(ttl)).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await?;
        let updated: bool = conn.pexpire(key, ms).await?;
        Ok(updated)
    }

    async fn delete_key(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.pool.get().await?;
        let deleted: i32 = conn.del(key).await?;
        Ok(deleted > 0)
    }

    async fn exists_key(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.pool.get().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn sadd(&self, key: &str, member: &str) -> CacheResult<()> {
        let mut conn = self.pool.get().await?;
        conn.sadd::<_, _, ()>(key, member).await?;
        Ok(())
    }

    async fn srem(&self, key: &str, member: &str) -> CacheResult<()> {
        let mut conn = self.pool.get().await?;
        conn.srem::<_, _, ()>(key, member).await?;
        Ok(())
    }

    async fn smembers(&self, key: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.pool.get().await?;
        let members: Vec<String> = conn.smembers(key).await?;
        Ok(members)
    }

    async fn srandmember(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let member: Option<String> = conn.srandmember(key).await?;
        Ok(member)
    }
}

#[async_trait]
impl LeaseStore for RedisLeaseStore {
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> RepoResult<()> {
        Ok(self.pool.set_raw(key, value, ttl).await?)
    }

    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.pool.get_raw(key).await?)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> RepoResult<bool> {
        Ok(self.expire_ms(key, ttl).await?)
    }

    async fn exists(&self, key: &str) -> RepoResult<bool> {
        Ok(self.exists_key(key).await?)
    }

    async fn delete(&self, key: &str) -> RepoResult<bool> {
        Ok(self.delete_key(key).await?)
    }

    async fn set_add(&self, key: &str, member: &str) -> RepoResult<()> {
        Ok(self.sadd(key, member).await?)
    }

    async fn set_remove(&self, key: &str, member: &str) -> RepoResult<()> {
        Ok(self.srem(key, member).await?)
    }

    async fn set_members(&self, key: &str) -> RepoResult<Vec<String>> {
        Ok(self.smembers(key).await?)
    }

    async fn set_random_member(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.srandmember(key).await?)
    }

    async fn scan_prefix(&self, prefix: &str) -> RepoResult<Vec<String>> {
        Ok(self.pool.scan_keys(&format!("{prefix}*")).await?)
    }
}
