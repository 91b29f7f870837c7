//! Lease-based service registry
//!
//! Holds no authoritative state of its own: leases and indices live in the
//! injected [`LeaseStore`], so any number of registry processes can share it.

use super::keys;
use async_trait::async_trait;
use game_core::{
    DomainError, GameId, LeaseRecord, LeaseStore, RegisterRequest, RegisterResponse, RegistryApi,
    RepoResult, RouteLookup, ServiceKind, ServiceRoute,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Lease lifetime without a heartbeat
pub const DEFAULT_LEASE_TTL: Duration = Duration::from_secs(10);

/// Outcome of one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Distinct endpoints holding a live lease
    pub live_endpoints: usize,
    /// Index keys examined
    pub index_keys: usize,
    /// Index memberships removed
    pub removed: usize,
}

/// Registry of live backend instances
pub struct ServiceRegistry {
    store: Arc<dyn LeaseStore>,
    ttl: Duration,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new(store: Arc<dyn LeaseStore>) -> Self {
        Self::with_ttl(store, DEFAULT_LEASE_TTL)
    }

    #[must_use]
    pub fn with_ttl(store: Arc<dyn LeaseStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    #[must_use]
    pub fn new_shared(store: Arc<dyn LeaseStore>, ttl: Duration) -> Arc<Self> {
        Arc::new(Self::with_ttl(store, ttl))
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Grant a lease to `endpoint` and index it under its kind and game IDs
    pub async fn register(
        &self,
        endpoint: &str,
        kind: ServiceKind,
        game_ids: &[GameId],
    ) -> RepoResult<String> {
        self.register_record(LeaseRecord::new(endpoint, kind, game_ids.to_vec()))
            .await
    }

    /// Register a prepared lease record
    pub async fn register_record(&self, record: LeaseRecord) -> RepoResult<String> {
        if record.endpoint.trim().is_empty() {
            return Err(DomainError::InvalidRequest("endpoint must not be empty".into()));
        }

        let lease_id = Uuid::new_v4().to_string();
        let value = serde_json::to_string(&record)
            .map_err(|e| DomainError::InternalError(format!("encode lease: {e}")))?;

        // Lease first, so an index entry never exists without its lease
        self.store
            .put(&keys::lease_key(&lease_id), &value, Some(self.ttl))
            .await?;
        self.store
            .set_add(&keys::kind_key(record.kind), &record.endpoint)
            .await?;
        for game_id in &record.game_ids {
            self.store
                .set_add(&keys::game_key(*game_id), &record.endpoint)
                .await?;
            self.store
                .put(&keys::game_meta_key(*game_id), record.kind.as_str(), None)
                .await?;
        }

        tracing::info!(
            lease_id = %lease_id,
            endpoint = %record.endpoint,
            kind = %record.kind,
            game_ids = ?record.game_ids,
            "Service registered"
        );

        Ok(lease_id)
    }

    /// Extend a lease. `LeaseNotFound` means the caller must register again.
    pub async fn heartbeat(&self, lease_id: &str, load: i64) -> RepoResult<()> {
        if self.store.expire(&keys::lease_key(lease_id), self.ttl).await? {
            tracing::trace!(lease_id = %lease_id, load, "Lease renewed");
            Ok(())
        } else {
            tracing::debug!(lease_id = %lease_id, "Heartbeat for unknown lease");
            Err(DomainError::LeaseNotFound(lease_id.to_string()))
        }
    }

    /// Drop a lease and its index entries. An unknown lease is a success.
    pub async fn deregister(&self, lease_id: &str) -> RepoResult<()> {
        let lease_key = keys::lease_key(lease_id);
        let Some(record) = self.read_lease(&lease_key).await? else {
            tracing::debug!(lease_id = %lease_id, "Deregister for unknown lease");
            return Ok(());
        };

        self.store.delete(&lease_key).await?;
        self.store
            .set_remove(&keys::kind_key(record.kind), &record.endpoint)
            .await?;
        for game_id in &record.game_ids {
            self.store
                .set_remove(&keys::game_key(*game_id), &record.endpoint)
                .await?;
        }

        tracing::info!(
            lease_id = %lease_id,
            endpoint = %record.endpoint,
            "Service deregistered"
        );
        Ok(())
    }

    /// Pick a random indexed instance for `game_id`. `None` when none is indexed.
    pub async fn select_service_by_game(&self, game_id: GameId) -> RepoResult<Option<ServiceRoute>> {
        let Some(endpoint) = self
            .store
            .set_random_member(&keys::game_key(game_id))
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(ServiceRoute::new(endpoint, self.game_kind(game_id).await?)))
    }

    /// Kind recorded for a game; missing or unreadable metadata is STATELESS
    async fn game_kind(&self, game_id: GameId) -> RepoResult<ServiceKind> {
        let kind = match self.store.get(&keys::game_meta_key(game_id)).await? {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(game_id, meta = %raw, "Unreadable game kind, routing as stateless");
                ServiceKind::Stateless
            }),
            None => ServiceKind::Stateless,
        };
        Ok(kind)
    }

    /// Every endpoint indexed under `kind`
    pub async fn endpoints_by_kind(&self, kind: ServiceKind) -> RepoResult<Vec<String>> {
        self.store.set_members(&keys::kind_key(kind)).await
    }

    /// A random endpoint indexed under `kind`
    pub async fn select_by_kind(&self, kind: ServiceKind) -> RepoResult<Option<String>> {
        self.store.set_random_member(&keys::kind_key(kind)).await
    }

    /// Remove index entries whose lease is gone.
    ///
    /// Validity is read from the live leases on every pass. Stale candidates
    /// are checked against a second lease scan before removal, so an instance
    /// that registers while the pass runs keeps its entries.
    pub async fn cleanup_dead_services(&self) -> RepoResult<CleanupReport> {
        let live = self.live_endpoints().await?;

        let mut index_keys = self.store.scan_prefix(keys::KIND_PREFIX).await?;
        index_keys.extend(self.store.scan_prefix(keys::GAME_PREFIX).await?);
        index_keys.retain(|key| keys::is_index_key(key));

        let mut stale = Vec::new();
        for key in &index_keys {
            for member in self.store.set_members(key).await? {
                if !live.contains(&member) {
                    stale.push((key.as_str(), member));
                }
            }
        }

        let mut report = CleanupReport {
            live_endpoints: live.len(),
            index_keys: index_keys.len(),
            removed: 0,
        };
        if stale.is_empty() {
            return Ok(report);
        }

        let live = self.live_endpoints().await?;
        for (key, member) in stale {
            if live.contains(&member) {
                continue;
            }
            self.store.set_remove(key, &member).await?;
            report.removed += 1;
            tracing::info!(key = %key, endpoint = %member, "Removed dead service from index");
        }

        Ok(report)
    }

    async fn live_endpoints(&self) -> RepoResult<HashSet<String>> {
        let mut live = HashSet::new();
        for key in self.store.scan_prefix(keys::LEASE_PREFIX).await? {
            if let Some(record) = self.read_lease(&key).await? {
                live.insert(record.endpoint);
            }
        }
        Ok(live)
    }

    /// Read a lease record; an unparseable record is treated as absent
    async fn read_lease(&self, lease_key: &str) -> RepoResult<Option<LeaseRecord>> {
        let Some(raw) = self.store.get(lease_key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(key = %lease_key, error = %e, "Skipping unreadable lease record");
                Ok(None)
            }
        }
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// In-process registry calls, used when the registrar runs next to the registry
#[async_trait]
impl RegistryApi for ServiceRegistry {
    async fn register(&self, request: RegisterRequest) -> RepoResult<RegisterResponse> {
        let record = LeaseRecord::new(request.endpoint, request.kind, request.game_ids)
            .with_service_name(request.service_name);
        let lease_id = self.register_record(record).await?;
        Ok(RegisterResponse {
            lease_id,
            ttl_seconds: self.ttl.as_secs(),
        })
    }

    async fn heartbeat(&self, lease_id: &str, load: i64) -> RepoResult<bool> {
        match ServiceRegistry::heartbeat(self, lease_id, load).await {
            Ok(()) => Ok(true),
            Err(DomainError::LeaseNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn deregister(&self, lease_id: &str) -> RepoResult<bool> {
        ServiceRegistry::deregister(self, lease_id).await?;
        Ok(true)
    }
}

#[async_trait]
impl RouteLookup for ServiceRegistry {
    async fn get_route(&self, game_id: GameId) -> RepoResult<Option<ServiceRoute>> {
        self.select_service_by_game(game_id).await
    }
}
