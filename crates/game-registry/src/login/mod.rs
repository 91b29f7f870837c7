//! Player login
//!
//! Resolves a token to a user, creating a guest on first sight, and
//! snapshots the user's wallet balance into the reply.

use async_trait::async_trait;
use game_core::{
    Authenticator, DomainError, LoginResponse, RepoResult, User, UserDirectory, Wallet,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// ID handed to the first auto-created guest
pub const FIRST_GUEST_ID: u64 = 100_000;

/// Token the mock authentication treats as forged
const REJECTED_TOKEN: &str = "invalid";

/// Token login backed by a user directory and a wallet
pub struct LoginService {
    users: Arc<dyn UserDirectory>,
    wallet: Arc<dyn Wallet>,
    next_guest_id: AtomicU64,
}

impl LoginService {
    pub fn new(users: Arc<dyn UserDirectory>, wallet: Arc<dyn Wallet>) -> Self {
        Self {
            users,
            wallet,
            next_guest_id: AtomicU64::new(FIRST_GUEST_ID),
        }
    }

    /// Resolve `token` to a user, registering a guest for an unseen token
    pub async fn authenticate(&self, token: &str) -> RepoResult<User> {
        if token.is_empty() || token == REJECTED_TOKEN {
            return Err(DomainError::InvalidToken);
        }

        if let Some(user) = self.users.find_by_token(token).await? {
            return Ok(user);
        }

        let id = self.next_guest_id.fetch_add(1, Ordering::Relaxed);
        let user = User::guest(id.to_string());
        self.users.create_with_token(token, &user).await?;

        tracing::info!(user_id = %user.id, name = %user.name, "Guest user created");
        Ok(user)
    }
}

impl std::fmt::Debug for LoginService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginService")
            .field("next_guest_id", &self.next_guest_id.load(Ordering::Relaxed))
            .finish()
    }
}

#[async_trait]
impl Authenticator for LoginService {
    async fn login(&self, token: &str) -> RepoResult<LoginResponse> {
        let user = match self.authenticate(token).await {
            Ok(user) => user,
            Err(e) if e.is_validation() || e.is_not_found() => {
                tracing::debug!(error = %e, "Login rejected");
                return Ok(LoginResponse::rejected(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        let balance = match self.wallet.get_balance(&user.id).await {
            Ok(balance) => balance,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Failed to fetch balance");
                return Ok(LoginResponse::rejected("Failed to retrieve wallet balance"));
            }
        };

        tracing::info!(user_id = %user.id, balance, "User logged in");
        Ok(LoginResponse::accepted(user.id, user.name, balance))
    }
}
