//! In-memory user directory.

use async_trait::async_trait;
use dashmap::DashMap;
use game_core::{RepoResult, User, UserDirectory};

/// `UserDirectory` kept in process memory; records never expire
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    tokens: DashMap<String, String>,
    users: DashMap<String, User>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user reachable through `token`
    #[must_use]
    pub fn with_user(self, token: impl Into<String>, user: User) -> Self {
        self.tokens.insert(token.into(), user.id.clone());
        self.users.insert(user.id.clone(), user);
        self
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserStore {
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<User>> {
        let user_id = match self.tokens.get(token) {
            Some(id) => id.clone(),
            None => return Ok(None),
        };
        self.find_by_id(&user_id).await
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn create_with_token(&self, token: &str, user: &User) -> RepoResult<()> {
        self.users.insert(user.id.clone(), user.clone());
        self.tokens.insert(token.to_string(), user.id.clone());
        Ok(())
    }
}
