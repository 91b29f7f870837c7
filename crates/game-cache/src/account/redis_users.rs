//! User directory in Redis.
//!
//! `token:<token>` holds the user ID, `user:<id>` the user JSON.

use crate::pool::RedisPool;
use async_trait::async_trait;
use game_core::{RepoResult, User, UserDirectory};
use std::time::Duration;

/// Key prefix for token to user ID bindings
const TOKEN_PREFIX: &str = "token:";
/// Key prefix for user records
const USER_PREFIX: &str = "user:";

/// Lifetime of auto-created guest records (1 hour)
pub const GUEST_TTL: Duration = Duration::from_secs(3600);

/// `UserDirectory` over Redis
#[derive(Clone, Debug)]
pub struct RedisUserStore {
    pool: RedisPool,
    ttl: Option<Duration>,
}

impl RedisUserStore {
    /// Create a store whose records expire after [`GUEST_TTL`]
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self {
            pool,
            ttl: Some(GUEST_TTL),
        }
    }

    /// Override the record lifetime (`None` keeps records forever)
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    fn token_key(token: &str) -> String {
        format!("{TOKEN_PREFIX}{token}")
    }

    fn user_key(id: &str) -> String {
        format!("{USER_PREFIX}{id}")
    }
}

#[async_trait]
impl UserDirectory for RedisUserStore {
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<User>> {
        match self.pool.get_raw(&Self::token_key(token)).await? {
            Some(user_id) => self.find_by_id(&user_id).await,
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        Ok(self.pool.get_json(&Self::user_key(id)).await?)
    }

    async fn create_with_token(&self, token: &str, user: &User) -> RepoResult<()> {
        self.pool
            .set_raw(&Self::token_key(token), &user.id, self.ttl)
            .await?;
        self.pool
            .set_json(&Self::user_key(&user.id), user, self.ttl)
            .await?;

        tracing::debug!(user_id = %user.id, "Stored user record");
        Ok(())
    }
}
