//! Per-connection session state
//!
//! ```text
//! Connected --login--> Authenticated --enterGame--> InGame
//! ```
//!
//! A sticky target can only exist inside a [`GameBinding`] whose route is
//! [`GameRoute::Sticky`], which is built only for stateful games.

use super::Deadline;
use game_core::{GameId, ServiceKind, ServiceRoute};

/// Where messages for the bound game go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameRoute {
    /// Stateful game: every message goes to this instance
    Sticky { endpoint: String },
    /// Stateless game: the instance is re-resolved per message
    Dynamic,
}

/// Game the session entered, committed only after the backend accepted the join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameBinding {
    pub game_id: GameId,
    pub route: GameRoute,
}

impl GameBinding {
    /// Bind to the instance that accepted the join
    pub fn new(game_id: GameId, accepted_by: &ServiceRoute) -> Self {
        let route = match accepted_by.kind {
            ServiceKind::Stateful => GameRoute::Sticky {
                endpoint: accepted_by.endpoint.clone(),
            },
            ServiceKind::Stateless => GameRoute::Dynamic,
        };
        Self { game_id, route }
    }

    pub fn kind(&self) -> ServiceKind {
        match self.route {
            GameRoute::Sticky { .. } => ServiceKind::Stateful,
            GameRoute::Dynamic => ServiceKind::Stateless,
        }
    }

    pub fn sticky_target(&self) -> Option<&str> {
        match &self.route {
            GameRoute::Sticky { endpoint } => Some(endpoint),
            GameRoute::Dynamic => None,
        }
    }
}

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Connected,
    Authenticated,
    InGame,
}

/// Mutable state of one client session
#[derive(Debug, Default)]
pub struct Session {
    user_id: Option<String>,
    game: Option<GameBinding>,
    login_deadline: Option<Deadline>,
    enter_game_deadline: Option<Deadline>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.user_id, &self.game) {
            (_, Some(_)) => SessionPhase::InGame,
            (Some(_), None) => SessionPhase::Authenticated,
            (None, None) => SessionPhase::Connected,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn game(&self) -> Option<&GameBinding> {
        self.game.as_ref()
    }

    /// Record the logged-in user and swap the login deadline for the enter-game one
    pub fn authenticate(&mut self, user_id: impl Into<String>, enter_game_deadline: Deadline) {
        self.user_id = Some(user_id.into());
        self.cancel_login_deadline();
        self.enter_game_deadline = Some(enter_game_deadline);
    }

    /// Commit an accepted join. The enter-game deadline stays armed until this point.
    pub fn enter_game(&mut self, binding: GameBinding) {
        self.game = Some(binding);
        self.cancel_enter_game_deadline();
    }

    pub fn set_login_deadline(&mut self, deadline: Deadline) {
        self.login_deadline = Some(deadline);
    }

    pub fn cancel_login_deadline(&mut self) {
        if let Some(deadline) = self.login_deadline.take() {
            deadline.cancel();
        }
    }

    pub fn cancel_enter_game_deadline(&mut self) {
        if let Some(deadline) = self.enter_game_deadline.take() {
            deadline.cancel();
        }
    }

    pub fn cancel_deadlines(&mut self) {
        self.cancel_login_deadline();
        self.cancel_enter_game_deadline();
    }

    pub fn has_pending_deadline(&self) -> bool {
        self.login_deadline.is_some() || self.enter_game_deadline.is_some()
    }
}
