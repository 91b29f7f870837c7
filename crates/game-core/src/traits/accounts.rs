//! Account ports - user directory and wallet

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::User;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve a login token to its user
    async fn find_by_token(&self, token: &str) -> RepoResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>>;

    /// Store a user and bind `token` to it
    async fn create_with_token(&self, token: &str, user: &User) -> RepoResult<()>;
}

#[async_trait]
pub trait Wallet: Send + Sync {
    /// Current balance, opening the account with the default balance on first use
    async fn get_balance(&self, user_id: &str) -> RepoResult<i64>;

    /// Add funds, returning the new balance
    async fn deposit(&self, user_id: &str, amount: i64) -> RepoResult<i64>;

    /// Remove funds, returning the new balance
    async fn withdraw(&self, user_id: &str, amount: i64) -> RepoResult<i64>;
}
