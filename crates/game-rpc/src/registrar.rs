//! Service registrar
//!
//! Runs inside every game backend instance and keeps it registered with the
//! central registry:
//!
//! ```text
//! Unregistered -> Registering -> Registered
//!                     ^              |
//!                     +-- heartbeat failed or lease lost
//! ```
//!
//! Registration is retried forever with a fixed delay until it succeeds or
//! the registrar is stopped. Failures are logged, never returned.

use game_core::{GameId, RegisterRequest, RegistryApi, ServiceKind};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Registrar settings
#[derive(Debug, Clone)]
pub struct RegistrarConfig {
    pub service_name: String,
    pub kind: ServiceKind,
    /// Address the gateway uses to reach this instance
    pub endpoint: String,
    pub game_ids: Vec<GameId>,
    /// Must be shorter than the registry's lease TTL
    pub heartbeat_interval: Duration,
    pub retry_delay: Duration,
    /// Bound on the best-effort deregistration made by [`Registrar::stop`]
    pub deregister_timeout: Duration,
}

impl RegistrarConfig {
    pub fn new(
        service_name: impl Into<String>,
        kind: ServiceKind,
        endpoint: impl Into<String>,
        game_ids: Vec<GameId>,
    ) -> Self {
        Self {
            service_name: service_name.into(),
            kind,
            endpoint: endpoint.into(),
            game_ids,
            heartbeat_interval: Duration::from_secs(5),
            retry_delay: Duration::from_secs(2),
            deregister_timeout: Duration::from_secs(3),
        }
    }

    fn request(&self) -> RegisterRequest {
        RegisterRequest {
            service_name: self.service_name.clone(),
            kind: self.kind,
            endpoint: self.endpoint.clone(),
            game_ids: self.game_ids.clone(),
        }
    }
}

/// Registration lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrarState {
    Unregistered,
    Registering,
    Registered,
    Stopped,
}

#[derive(Debug)]
struct Inner {
    state: RegistrarState,
    lease_id: Option<String>,
}

/// Keeps one backend instance registered
pub struct Registrar {
    registry: Arc<dyn RegistryApi>,
    config: RegistrarConfig,
    inner: Mutex<Inner>,
    load: AtomicI64,
    shutdown: watch::Sender<bool>,
}

impl Registrar {
    pub fn new(registry: Arc<dyn RegistryApi>, config: RegistrarConfig) -> Arc<Self> {
        let (shutdown, _) = watch::channel(false);
        Arc::new(Self {
            registry,
            config,
            inner: Mutex::new(Inner {
                state: RegistrarState::Unregistered,
                lease_id: None,
            }),
            load: AtomicI64::new(0),
            shutdown,
        })
    }

    pub fn state(&self) -> RegistrarState {
        self.inner.lock().state
    }

    /// Current lease ID, if registered
    pub fn lease_id(&self) -> Option<String> {
        self.inner.lock().lease_id.clone()
    }

    /// Load figure reported with each heartbeat
    pub fn set_load(&self, load: i64) {
        self.load.store(load, Ordering::Relaxed);
    }

    /// Start the register/heartbeat loop in the background
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let registrar = Arc::clone(self);
        tokio::spawn(async move { registrar.run().await })
    }

    /// Register, then heartbeat until the lease is lost; repeat until stopped
    pub async fn run(&self) {
        let mut shutdown = self.shutdown.subscribe();
        while let Some(lease_id) = self.register_with(&mut shutdown).await {
            if self.heartbeat_loop(&lease_id, &mut shutdown).await {
                break;
            }
            self.clear_lease(&lease_id);
        }
        tracing::debug!(endpoint = %self.config.endpoint, "Registrar loop exited");
    }

    /// Register, retrying until it succeeds. `None` once stopped.
    pub async fn register(&self) -> Option<String> {
        let mut shutdown = self.shutdown.subscribe();
        self.register_with(&mut shutdown).await
    }

    /// Stop the loop and deregister the current lease.
    ///
    /// Idempotent. The deregistration is best-effort and bounded by
    /// `deregister_timeout`.
    pub async fn stop(&self) {
        let lease_id = {
            let mut inner = self.inner.lock();
            if inner.state == RegistrarState::Stopped {
                return;
            }
            inner.state = RegistrarState::Stopped;
            inner.lease_id.take()
        };
        self.shutdown.send_replace(true);

        if let Some(lease_id) = lease_id {
            self.deregister(&lease_id).await;
        }
        tracing::info!(endpoint = %self.config.endpoint, "Registrar stopped");
    }

    async fn register_with(&self, shutdown: &mut watch::Receiver<bool>) -> Option<String> {
        if !self.transition(RegistrarState::Registering) {
            return None;
        }

        loop {
            match self.registry.register(self.config.request()).await {
                Ok(response) => {
                    if self.commit_lease(&response.lease_id) {
                        tracing::info!(
                            lease_id = %response.lease_id,
                            endpoint = %self.config.endpoint,
                            kind = %self.config.kind,
                            game_ids = ?self.config.game_ids,
                            ttl_seconds = response.ttl_seconds,
                            "Registered with central registry"
                        );
                        return Some(response.lease_id);
                    }
                    // Stopped while the call was in flight
                    self.deregister(&response.lease_id).await;
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        endpoint = %self.config.endpoint,
                        retry_in_ms = self.config.retry_delay.as_millis() as u64,
                        "Registration failed, retrying"
                    );
                }
            }

            tokio::select! {
                () = wait_stopped(shutdown) => return None,
                () = tokio::time::sleep(self.config.retry_delay) => {}
            }
        }
    }

    /// Returns `true` if the loop ended because of shutdown
    async fn heartbeat_loop(&self, lease_id: &str, shutdown: &mut watch::Receiver<bool>) -> bool {
        let mut ticker = tokio::time::interval(self.config.heartbeat_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                () = wait_stopped(shutdown) => return true,
                _ = ticker.tick() => {}
            }

            let load = self.load.load(Ordering::Relaxed);
            match self.registry.heartbeat(lease_id, load).await {
                Ok(true) => {
                    tracing::trace!(lease_id = %lease_id, load, "Heartbeat sent");
                }
                Ok(false) => {
                    tracing::warn!(lease_id = %lease_id, "Lease lost, re-registering");
                    return false;
                }
                Err(e) => {
                    tracing::warn!(lease_id = %lease_id, error = %e, "Heartbeat failed, re-registering");
                    return false;
                }
            }
        }
    }

    async fn deregister(&self, lease_id: &str) {
        let call = self.registry.deregister(lease_id);
        match tokio::time::timeout(self.config.deregister_timeout, call).await {
            Ok(Ok(_)) => tracing::info!(lease_id = %lease_id, "Deregistered"),
            Ok(Err(e)) => tracing::warn!(lease_id = %lease_id, error = %e, "Deregister failed"),
            Err(_) => tracing::warn!(lease_id = %lease_id, "Deregister timed out"),
        }
    }

    fn transition(&self, state: RegistrarState) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == RegistrarState::Stopped {
            return false;
        }
        inner.state = state;
        true
    }

    fn commit_lease(&self, lease_id: &str) -> bool {
        let mut inner = self.inner.lock();
        if inner.state == RegistrarState::Stopped {
            return false;
        }
        inner.state = RegistrarState::Registered;
        inner.lease_id = Some(lease_id.to_string());
        true
    }

    fn clear_lease(&self, lease_id: &str) {
        let mut inner = self.inner.lock();
        if inner.lease_id.as_deref() == Some(lease_id) {
            inner.lease_id = None;
        }
    }
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Registrar")
            .field("endpoint", &self.config.endpoint)
            .field("state", &inner.state)
            .field("lease_id", &inner.lease_id)
            .finish()
    }
}

/// Resolves once the shutdown flag is set
async fn wait_stopped(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
