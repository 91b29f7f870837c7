//! Key/value store port backing the service registry
//!
//! The registry holds no authoritative in-process state; everything lives
//! behind this trait so several registry processes can share one store.

use std::time::Duration;

use async_trait::async_trait;

use super::RepoResult;

/// Key/value store with per-key TTL and set operations.
///
/// String keys and set keys share one namespace, as in Redis. Every method
/// is safe to call concurrently; implementations synchronize internally.
#[async_trait]
pub trait LeaseStore: Send + Sync {
    /// Set a string value, replacing any previous value and TTL
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> RepoResult<()>;

    /// Get a live string value
    async fn get(&self, key: &str) -> RepoResult<Option<String>>;

    /// Reset the TTL of a live key. Returns `false` if the key is absent or expired.
    async fn expire(&self, key: &str, ttl: Duration) -> RepoResult<bool>;

    /// Check if a key (string or set) is live
    async fn exists(&self, key: &str) -> RepoResult<bool>;

    /// Delete a key of any type. Returns `true` if something was removed.
    async fn delete(&self, key: &str) -> RepoResult<bool>;

    /// Add a member to a set
    async fn set_add(&self, key: &str, member: &str) -> RepoResult<()>;

    /// Remove a member from a set
    async fn set_remove(&self, key: &str, member: &str) -> RepoResult<()>;

    /// All members of a set (empty if the set does not exist)
    async fn set_members(&self, key: &str) -> RepoResult<Vec<String>>;

    /// A uniformly random member of a set, `None` if it is empty
    async fn set_random_member(&self, key: &str) -> RepoResult<Option<String>>;

    /// All live keys starting with `prefix`
    async fn scan_prefix(&self, prefix: &str) -> RepoResult<Vec<String>>;
}
