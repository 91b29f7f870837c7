//! Connection pool
//!
//! Caches one client per remote address. Clients are created lazily on first
//! use and shared by every caller afterwards.

use crate::error::RpcResult;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

type Dialer<C> = dyn Fn(&str) -> RpcResult<Arc<C>> + Send + Sync;

/// Address-keyed client cache.
///
/// `C` is usually a port trait object such as `dyn GameService`. The dialer
/// only builds a client; it does not touch the network, so a cached client
/// is never validated here and transport errors surface on the actual call.
pub struct ConnectionPool<C: ?Sized> {
    channels: DashMap<String, Arc<C>>,
    dialer: Box<Dialer<C>>,
}

impl<C: ?Sized + Send + Sync> ConnectionPool<C> {
    /// Create an empty pool that builds clients with `dialer`
    pub fn new<F>(dialer: F) -> Self
    where
        F: Fn(&str) -> RpcResult<Arc<C>> + Send + Sync + 'static,
    {
        Self {
            channels: DashMap::new(),
            dialer: Box::new(dialer),
        }
    }

    /// Get the client for `address`, creating it on first use.
    ///
    /// Concurrent first calls for the same address create exactly one client:
    /// creation happens while holding that address's map entry.
    pub fn get_connection(&self, address: &str) -> RpcResult<Arc<C>> {
        if let Some(channel) = self.channels.get(address) {
            return Ok(channel.clone());
        }

        match self.channels.entry(address.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let channel = (self.dialer)(address)?;
                entry.insert(channel.clone());
                tracing::debug!(address = %address, "Created pooled connection");
                Ok(channel)
            }
        }
    }

    /// Drop the cached client for `address` so the next call builds a fresh one
    pub fn evict(&self, address: &str) -> bool {
        self.channels.remove(address).is_some()
    }

    /// Tear down every cached client
    pub fn close(&self) {
        let count = self.channels.len();
        self.channels.clear();
        tracing::debug!(count, "Connection pool closed");
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl<C: ?Sized> std::fmt::Debug for ConnectionPool<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("connections", &self.channels.len())
            .finish()
    }
}
