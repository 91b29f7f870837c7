//! Peer registry of a stateful instance

use super::Peer;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Peers of a stateful game, keyed by gateway session id
#[derive(Debug, Default)]
pub struct PeerManager {
    peers: DashMap<String, Arc<Peer>>,
}

impl PeerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, peer: Arc<Peer>) {
        self.peers.insert(peer.session_id().to_string(), peer);
    }

    pub fn remove(&self, session_id: &str) -> Option<Arc<Peer>> {
        self.peers.remove(session_id).map(|(_, peer)| peer)
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Peer>> {
        self.peers.get(session_id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    /// Push `payload` to every peer, one task per peer. Failures are logged.
    pub fn broadcast(&self, payload: &[u8]) -> Vec<JoinHandle<()>> {
        let peers: Vec<Arc<Peer>> = self.peers.iter().map(|r| r.value().clone()).collect();

        peers
            .into_iter()
            .map(|peer| {
                let payload = payload.to_vec();
                tokio::spawn(async move {
                    if let Err(e) = peer.send(payload).await {
                        tracing::warn!(
                            session_id = %peer.session_id(),
                            error = %e,
                            "Broadcast failed"
                        );
                    }
                })
            })
            .collect()
    }
}
