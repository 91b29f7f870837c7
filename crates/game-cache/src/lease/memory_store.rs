//! In-memory lease store.
//!
//! Mirrors the Redis semantics the registry relies on: one key namespace
//! shared by strings and sets, per-key TTL, and empty sets disappearing.
//! Expiry is lazy and measured on the tokio clock.

use async_trait::async_trait;
use dashmap::DashMap;
use game_core::{DomainError, LeaseStore, RepoResult};
use rand::seq::IteratorRandom;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
enum Value {
    Text(String),
    Set(HashSet<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn text(value: &str, ttl: Option<Duration>) -> Self {
        Self {
            value: Value::Text(value.to_string()),
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    fn empty_set() -> Self {
        Self {
            value: Value::Set(HashSet::new()),
            expires_at: None,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

fn wrong_type(key: &str) -> DomainError {
    DomainError::StoreError(format!("Wrong value type at key {key}"))
}

/// `LeaseStore` kept in process memory
#[derive(Debug, Default)]
pub struct MemoryLeaseStore {
    entries: DashMap<String, Entry>,
}

impl MemoryLeaseStore {
    /// Create a new in-memory store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new in-memory store wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Drop every expired key, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of keys currently held, expired or not
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run `f` against a live entry, evicting it if it has expired
    fn with_live<R>(&self, key: &str, f: impl FnOnce(&Entry) -> R) -> Option<R> {
        let now = Instant::now();
        match self.entries.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => return Some(f(&entry)),
            Some(_) => {}
        }
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        None
    }
}

#[async_trait]
impl LeaseStore for MemoryLeaseStore {
    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> RepoResult<()> {
        self.entries.insert(key.to_string(), Entry::text(value, ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> RepoResult<Option<String>> {
        match self.with_live(key, |entry| entry.value.clone()) {
            None => Ok(None),
            Some(Value::Text(value)) => Ok(Some(value)),
            Some(Value::Set(_)) => Err(wrong_type(key)),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> RepoResult<bool> {
        let now = Instant::now();
        let mut expired = false;
        if let Some(mut entry) = self.entries.get_mut(key) {
            if entry.is_expired(now) {
                expired = true;
            } else {
                entry.expires_at = Some(now + ttl);
                return Ok(true);
            }
        }
        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        Ok(false)
    }

    async fn exists(&self, key: &str) -> RepoResult<bool> {
        Ok(self.with_live(key, |_| ()).is_some())
    }

    async fn delete(&self, key: &str) -> RepoResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }

    async fn set_add(&self, key: &str, member: &str) -> RepoResult<()> {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(Entry::empty_set);
        if entry.is_expired(now) {
            *entry = Entry::empty_set();
        }
        match &mut entry.value {
            Value::Set(members) => {
                members.insert(member.to_string());
                Ok(())
            }
            Value::Text(_) => Err(wrong_type(key)),
        }
    }

    async fn set_remove(&self, key: &str, member: &str) -> RepoResult<()> {
        if let Some(mut entry) = self.entries.get_mut(key) {
            match &mut entry.value {
                Value::Set(members) => {
                    members.remove(member);
                }
                Value::Text(_) => return Err(wrong_type(key)),
            }
        }
        // Empty sets cease to exist
        self.entries
            .remove_if(key, |_, entry| matches!(&entry.value, Value::Set(m) if m.is_empty()));
        Ok(())
    }

    async fn set_members(&self, key: &str) -> RepoResult<Vec<String>> {
        match self.with_live(key, |entry| entry.value.clone()) {
            None => Ok(Vec::new()),
            Some(Value::Set(members)) => Ok(members.into_iter().collect()),
            Some(Value::Text(_)) => Err(wrong_type(key)),
        }
    }

    async fn set_random_member(&self, key: &str) -> RepoResult<Option<String>> {
        let picked = self.with_live(key, |entry| match &entry.value {
            Value::Set(members) => Ok(members.iter().choose(&mut rand::thread_rng()).cloned()),
            Value::Text(_) => Err(wrong_type(key)),
        });
        picked.unwrap_or(Ok(None))
    }

    async fn scan_prefix(&self, prefix: &str) -> RepoResult<Vec<String>> {
        let now = Instant::now();
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().starts_with(prefix) && !entry.is_expired(now))
            .map(|entry| entry.key().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_put_expires_after_ttl() {
        let store = MemoryLeaseStore::new();
        store
            .put("services:lease:a", "{}", Some(Duration::from_secs(10)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(store.exists("services:lease:a").await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!store.exists("services:lease:a").await.unwrap());
        assert_eq!(store.get("services:lease:a").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expire_refreshes_live_key_only() {
        let store = MemoryLeaseStore::new();
        let ttl = Duration::from_secs(10);
        store.put("k", "v", Some(ttl)).await.unwrap();

        tokio::time::advance(Duration::from_secs(8)).await;
        assert!(store.expire("k", ttl).await.unwrap());

        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(3)).await;
        assert!(!store.expire("k", ttl).await.unwrap());
        assert!(!store.expire("missing", ttl).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_operations() {
        let store = MemoryLeaseStore::new();
        store.set_add("game:1001", "a:9000").await.unwrap();
        store.set_add("game:1001", "b:9000").await.unwrap();
        store.set_add("game:1001", "a:9000").await.unwrap();

        let mut members = store.set_members("game:1001").await.unwrap();
        members.sort();
        assert_eq!(members, vec!["a:9000", "b:9000"]);

        let picked = store.set_random_member("game:1001").await.unwrap().unwrap();
        assert!(picked == "a:9000" || picked == "b:9000");

        store.set_remove("game:1001", "a:9000").await.unwrap();
        store.set_remove("game:1001", "b:9000").await.unwrap();
        assert!(!store.exists("game:1001").await.unwrap());
        assert_eq!(store.set_random_member("game:1001").await.unwrap(), None);
        assert!(store.set_members("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let store = MemoryLeaseStore::new();
        store.put("k", "v", None).await.unwrap();
        assert!(store.set_add("k", "m").await.is_err());

        store.set_add("s", "m").await.unwrap();
        assert!(store.get("s").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_prefix_skips_expired() {
        let store = MemoryLeaseStore::new();
        store
            .put("services:lease:short", "{}", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        store.put("services:lease:long", "{}", None).await.unwrap();
        store.set_add("services:STATEFUL", "a:1").await.unwrap();
        store.set_add("game:7", "a:1").await.unwrap();

        tokio::time::advance(Duration::from_secs(2)).await;

        assert_eq!(
            store.scan_prefix("services:lease:").await.unwrap(),
            vec!["services:lease:long".to_string()]
        );
        let mut services = store.scan_prefix("services:").await.unwrap();
        services.sort();
        assert_eq!(services, vec!["services:STATEFUL", "services:lease:long"]);

        assert_eq!(store.purge_expired(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryLeaseStore::new();
        store.put("k", "v", None).await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
    }
}
