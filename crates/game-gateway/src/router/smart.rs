//! Hint-driven router

use super::{Discovery, RouteError};
use game_core::{GameId, ServiceKind, ServiceRoute};
use std::sync::Arc;
use std::time::Duration;

/// Logical target for stateful instances
pub const STATEFUL_TARGET: &str = "stateful-service";

/// Logical target for stateless instances, also used when no kind is given
pub const STATELESS_TARGET: &str = "stateless-service";

/// What the caller knows about the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteHint {
    pub game_id: Option<GameId>,
    pub kind: Option<ServiceKind>,
}

impl RouteHint {
    pub fn game(game_id: GameId) -> Self {
        Self {
            game_id: Some(game_id),
            kind: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ServiceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn target(&self) -> &'static str {
        match self.kind {
            Some(ServiceKind::Stateful) => STATEFUL_TARGET,
            Some(ServiceKind::Stateless) | None => STATELESS_TARGET,
        }
    }
}

/// Router over a discovery source
#[derive(Clone)]
pub struct SmartRouter {
    discovery: Arc<dyn Discovery>,
}

impl SmartRouter {
    pub fn new(discovery: Arc<dyn Discovery>) -> Self {
        Self { discovery }
    }

    /// Resolve a hint to an instance
    pub async fn route(&self, hint: &RouteHint) -> Result<ServiceRoute, RouteError> {
        let target = hint.target();
        let route = self.discovery.resolve(target, hint).await?;
        tracing::debug!(
            target,
            game_id = ?hint.game_id,
            endpoint = %route.endpoint,
            kind = %route.kind,
            "Route resolved"
        );
        Ok(route)
    }

    pub async fn route_game(&self, game_id: GameId) -> Result<ServiceRoute, RouteError> {
        self.route(&RouteHint::game(game_id)).await
    }

    /// [`route`](Self::route) bounded by `limit`
    pub async fn route_within(
        &self,
        hint: &RouteHint,
        limit: Duration,
    ) -> Result<ServiceRoute, RouteError> {
        tokio::time::timeout(limit, self.route(hint))
            .await
            .map_err(|_| RouteError::Timeout)?
    }
}

impl std::fmt::Debug for SmartRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartRouter").finish_non_exhaustive()
    }
}
