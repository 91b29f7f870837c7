//! Gateway state
//!
//! Shared dependencies of the WebSocket and connector servers.

use crate::router::SmartRouter;
use crate::session::SessionTable;
use game_common::GatewayConfig;
use game_core::Authenticator;
use game_rpc::GamePool;
use std::sync::Arc;
use std::time::Duration;

/// Session timers and per-call RPC timeouts
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    /// Address game instances use to reach the connector surface
    pub advertise_addr: String,
    /// Time allowed between connect and a successful login
    pub login_timeout: Duration,
    /// Time allowed between login and entering a game
    pub enter_game_timeout: Duration,
    pub auth_timeout: Duration,
    /// Route lookup while entering a game
    pub enter_route_timeout: Duration,
    /// Route lookup per forwarded message and on disconnect
    pub route_timeout: Duration,
    pub join_timeout: Duration,
    pub quit_timeout: Duration,
    pub message_timeout: Duration,
    /// Delay between an auth failure reply and the close
    pub kick_grace: Duration,
}

impl GatewaySettings {
    pub fn new(advertise_addr: impl Into<String>) -> Self {
        Self {
            advertise_addr: advertise_addr.into(),
            login_timeout: Duration::from_secs(10),
            enter_game_timeout: Duration::from_secs(180),
            auth_timeout: Duration::from_secs(3),
            enter_route_timeout: Duration::from_secs(3),
            route_timeout: Duration::from_secs(1),
            join_timeout: Duration::from_secs(3),
            quit_timeout: Duration::from_secs(3),
            message_timeout: Duration::from_secs(5),
            kick_grace: Duration::from_millis(100),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            login_timeout: config.login_timeout(),
            enter_game_timeout: config.enter_game_timeout(),
            ..Self::new(config.advertise_addr.clone())
        }
    }
}

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    settings: Arc<GatewaySettings>,
    sessions: Arc<SessionTable>,
    router: SmartRouter,
    authenticator: Arc<dyn Authenticator>,
    game_pool: Arc<GamePool>,
}

impl GatewayState {
    pub fn new(
        settings: GatewaySettings,
        router: SmartRouter,
        authenticator: Arc<dyn Authenticator>,
        game_pool: Arc<GamePool>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            sessions: SessionTable::new_shared(),
            router,
            authenticator,
            game_pool,
        }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Live client sessions
    pub fn sessions(&self) -> &Arc<SessionTable> {
        &self.sessions
    }

    pub fn router(&self) -> &SmartRouter {
        &self.router
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    /// Clients of game instances, keyed by endpoint
    pub fn game_pool(&self) -> &GamePool {
        &self.game_pool
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("settings", &self.settings)
            .field("sessions", &self.sessions.count())
            .field("game_pool", &self.game_pool.len())
            .finish_non_exhaustive()
    }
}
