//! Service entities - backend instance kinds, leases, and routes

use serde::{Deserialize, Serialize};

/// Numeric identifier of a game served by one or more backend instances
pub type GameId = i32;

/// How a backend instance holds player state.
///
/// Exactly two kinds exist, so every branch on the kind is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceKind {
    /// Keeps per-player state in memory; sessions stick to one instance
    Stateful,
    /// Keeps no per-player state; every message may land on a different instance
    Stateless,
}

impl ServiceKind {
    /// Wire and key representation (`STATEFUL` / `STATELESS`)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stateful => "STATEFUL",
            Self::Stateless => "STATELESS",
        }
    }

    /// Check if sessions must be pinned to one instance
    #[inline]
    pub fn is_stateful(&self) -> bool {
        matches!(self, Self::Stateful)
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STATEFUL" => Ok(Self::Stateful),
            "STATELESS" => Ok(Self::Stateless),
            _ => Err(format!("Invalid service kind: {s}")),
        }
    }
}

/// Lease record stored under `services:lease:<lease_id>` for as long as the
/// owning instance keeps heartbeating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    pub endpoint: String,
    #[serde(rename = "service_type")]
    pub kind: ServiceKind,
    #[serde(default)]
    pub game_ids: Vec<GameId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_name: String,
}

impl LeaseRecord {
    /// Create a new lease record
    pub fn new(endpoint: impl Into<String>, kind: ServiceKind, game_ids: Vec<GameId>) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind,
            game_ids,
            service_name: String::new(),
        }
    }

    /// Attach the logical service name the instance registered under
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}

/// A resolved backend instance for a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRoute {
    pub endpoint: String,
    pub kind: ServiceKind,
}

impl ServiceRoute {
    pub fn new(endpoint: impl Into<String>, kind: ServiceKind) -> Self {
        Self {
            endpoint: endpoint.into(),
            kind,
        }
    }
}
