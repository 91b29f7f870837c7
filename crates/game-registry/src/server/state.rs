//! Registry application state

use crate::login::LoginService;
use crate::registry::ServiceRegistry;
use std::sync::Arc;

/// State shared across registry handlers
#[derive(Clone)]
pub struct RegistryState {
    registry: Arc<ServiceRegistry>,
    login: Arc<LoginService>,
}

impl RegistryState {
    pub fn new(registry: Arc<ServiceRegistry>, login: Arc<LoginService>) -> Self {
        Self { registry, login }
    }

    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    pub fn login(&self) -> &LoginService {
        &self.login
    }
}

impl std::fmt::Debug for RegistryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryState")
            .field("registry", &self.registry)
            .field("login", &self.login)
            .finish()
    }
}
