//! Discovery sources

use super::{RouteError, RouteHint};
use async_trait::async_trait;
use game_core::{RouteLookup, ServiceKind, ServiceRoute};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a routing target to a live instance
#[async_trait]
pub trait Discovery: Send + Sync {
    async fn resolve(&self, target: &str, hint: &RouteHint) -> Result<ServiceRoute, RouteError>;
}

/// Fixed routing table, keyed by game id or service name.
///
/// Entries are `host:port` with an optional `@stateful` / `@stateless` suffix;
/// without a suffix the instance is stateless.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    routes: HashMap<String, ServiceRoute>,
}

impl StaticDiscovery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `key -> host:port[@kind]` entries
    ///
    /// # Errors
    /// Returns the offending entry if a kind suffix is not recognized
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut discovery = Self::new();
        for (key, value) in entries {
            let route = match value.rsplit_once('@') {
                Some((endpoint, kind)) => ServiceRoute::new(endpoint.trim(), kind.parse()?),
                None => ServiceRoute::new(value.trim(), ServiceKind::Stateless),
            };
            discovery.routes.insert(key.clone(), route);
        }
        Ok(discovery)
    }

    #[must_use]
    pub fn with_route(mut self, key: impl Into<String>, route: ServiceRoute) -> Self {
        self.routes.insert(key.into(), route);
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[async_trait]
impl Discovery for StaticDiscovery {
    async fn resolve(&self, target: &str, hint: &RouteHint) -> Result<ServiceRoute, RouteError> {
        let key = hint
            .game_id
            .map_or_else(|| target.to_string(), |id| id.to_string());

        self.routes
            .get(&key)
            .cloned()
            .ok_or(RouteError::NotFound(key))
    }
}

/// Discovery through the central registry's route lookup
#[derive(Clone)]
pub struct RegistryDiscovery {
    lookup: Arc<dyn RouteLookup>,
}

impl RegistryDiscovery {
    pub fn new(lookup: Arc<dyn RouteLookup>) -> Self {
        Self { lookup }
    }
}

impl std::fmt::Debug for RegistryDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryDiscovery").finish_non_exhaustive()
    }
}

#[async_trait]
impl Discovery for RegistryDiscovery {
    async fn resolve(&self, _target: &str, hint: &RouteHint) -> Result<ServiceRoute, RouteError> {
        let game_id = hint.game_id.ok_or(RouteError::MissingGameId)?;

        self.lookup
            .get_route(game_id)
            .await?
            .ok_or(RouteError::NoInstance(game_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{GameId, RepoResult};

    #[tokio::test]
    async fn test_static_entries() {
        let entries: HashMap<String, String> = [
            ("1001".to_string(), "10.0.0.1:9000@stateful".to_string()),
            ("slots".to_string(), "10.0.0.2:9000".to_string()),
        ]
        .into_iter()
        .collect();
        let discovery = StaticDiscovery::from_entries(&entries).unwrap();
        assert_eq!(discovery.len(), 2);

        let by_game = discovery
            .resolve("stateless-service", &RouteHint::game(1001))
            .await
            .unwrap();
        assert_eq!(by_game, ServiceRoute::new("10.0.0.1:9000", ServiceKind::Stateful));

        let by_name = discovery.resolve("slots", &RouteHint::default()).await.unwrap();
        assert_eq!(by_name.kind, ServiceKind::Stateless);

        let missing = discovery.resolve("x", &RouteHint::game(7)).await;
        assert!(matches!(missing, Err(RouteError::NotFound(key)) if key == "7"));
    }

    #[test]
    fn test_static_rejects_unknown_kind() {
        let entries: HashMap<String, String> =
            [("1".to_string(), "h:1@sticky".to_string())].into_iter().collect();
        assert!(StaticDiscovery::from_entries(&entries).is_err());
    }

    struct OneGame;

    #[async_trait]
    impl RouteLookup for OneGame {
        async fn get_route(&self, game_id: GameId) -> RepoResult<Option<ServiceRoute>> {
            Ok((game_id == 1001).then(|| ServiceRoute::new("a:1", ServiceKind::Stateless)))
        }
    }

    #[tokio::test]
    async fn test_registry_requires_game_id() {
        let discovery = RegistryDiscovery::new(Arc::new(OneGame));

        let route = discovery.resolve("", &RouteHint::game(1001)).await.unwrap();
        assert_eq!(route.endpoint, "a:1");

        assert!(matches!(
            discovery.resolve("", &RouteHint::default()).await,
            Err(RouteError::MissingGameId)
        ));
        assert!(matches!(
            discovery.resolve("", &RouteHint::game(2)).await,
            Err(RouteError::NoInstance(2))
        ));
    }
}
